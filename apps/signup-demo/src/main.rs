//! Headless signup form demo.
//!
//! Wires a two-field signup form to the controller, replays a scripted
//! user session (typo, blur validation, fix, submit) and prints the
//! accepted values. Run with `RUST_LOG=trace` to watch every state
//! transition.

use minform_core::{FieldMap, FormConfig, FormController};
use minform_testing::FormRobot;

fn signup_validator(values: &FieldMap) -> FieldMap {
    let mut out = FieldMap::default();

    let email = values.get("email").map(String::as_str).unwrap_or("");
    if email.is_empty() {
        out.insert("email".to_string(), "email is required".to_string());
    } else if !email.contains('@') {
        out.insert("email".to_string(), "not a valid email address".to_string());
    }

    let password = values.get("password").map(String::as_str).unwrap_or("");
    if password.len() < 8 {
        out.insert(
            "password".to_string(),
            "password must be at least 8 characters".to_string(),
        );
    }

    out
}

fn report(form: &FormController, label: &str) {
    let values = form.values();
    let mut fields: Vec<&String> = values.keys().collect();
    fields.sort();
    println!("-- {label} (valid: {})", form.is_valid());
    for field in fields {
        let attributes = form.attributes(field);
        let status = if attributes.error() {
            attributes.helper_text().to_string()
        } else {
            "ok".to_string()
        };
        println!("   {}: {:?} [{}]", field, attributes.value(), status);
    }
}

fn main() {
    let _ = env_logger::try_init();

    let mut defaults = FieldMap::default();
    defaults.insert("email".to_string(), String::new());
    defaults.insert("password".to_string(), String::new());

    let form = FormController::new(FormConfig {
        default_values: defaults,
        default_errors: None,
    });
    form.validate(signup_validator);

    let robot = FormRobot::new(form.clone());

    robot.type_into("email", "zaphod.beeblebrox");
    robot.type_into("password", "pan galactic gargle blaster");

    let first = robot.press_submit();
    log::info!("first submit accepted: {}", first.accepted);
    report(&form, "after submitting a bad address");

    robot.type_into("email", "zaphod@heartofgold.ship");
    robot.leave("email");
    report(&form, "after fixing the address");

    let second = robot.press_submit();
    log::info!("second submit accepted: {}", second.accepted);
    match second.values {
        Some(values) => {
            let mut fields: Vec<(&String, &String)> = values.iter().collect();
            fields.sort();
            println!("-- accepted submission");
            for (field, value) in fields {
                println!("   {field}: {value:?}");
            }
        }
        None => println!("-- submission rejected"),
    }
}
