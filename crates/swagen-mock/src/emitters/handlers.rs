use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;

/// One `"METHOD /path": body` entry of a mock module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockRoute {
    /// Quoted route key, e.g. `"GET /pets/:id"`.
    pub key: String,
    /// JSON body, already indented for its position in the module.
    pub body: String,
}

fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_template("handlers.js.j2", include_str!("../../templates/handlers.js.j2"))?;
    env.add_template("index.js.j2", include_str!("../../templates/index.js.j2"))?;
    Ok(env)
}

/// Emit a tag's mock module.
pub fn emit_handlers(routes: &[MockRoute], description: Option<&str>) -> Result<String, minijinja::Error> {
    let env = environment()?;
    let tmpl = env.get_template("handlers.js.j2")?;
    tmpl.render(context! {
        routes => routes,
        description => description.map(|d| d.split_whitespace().collect::<Vec<_>>().join(" ")),
    })
}

/// Emit `index.js`, merging every tag module into one route table.
pub fn emit_index(modules: &[String]) -> Result<String, minijinja::Error> {
    let env = environment()?;
    let tmpl = env.get_template("index.js.j2")?;
    tmpl.render(context! { modules => modules })
}
