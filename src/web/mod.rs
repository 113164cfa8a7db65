pub mod handlers;
pub mod models;
pub mod routes;

use tera::Tera;

/// Page templates are compiled into the binary so the server can start from
/// any working directory.
pub fn load_templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        ("index.html", include_str!("../../templates/index.html")),
        ("chat.html", include_str!("../../templates/chat.html")),
    ])?;
    tera.autoescape_on(vec![".html"]);
    Ok(tera)
}
