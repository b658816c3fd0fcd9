use minijinja::{AutoEscape, Environment};

use crate::compile::doc::escape_jsdoc;

/// Environment holding the fixed, compiled-in templates.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("escape_jsdoc", |value: String| escape_jsdoc(&value));
    env.add_template("header.j2", include_str!("../templates/header.j2"))?;
    env.add_template("request.ts.j2", include_str!("../templates/request.ts.j2"))?;
    env.add_template("request.js.j2", include_str!("../templates/request.js.j2"))?;
    Ok(env)
}
