use crate::{domain::DisplayRegion, regions::Page};
use minijinja::{context, Environment};

pub const INDEX_TEMPLATE: &str = "index.html";

/// Template environment with the page template compiled in.
/// `.html` names get HTML auto-escaping.
pub fn create_environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
    Ok(env)
}

/// Renders the current state of `page`; `query` refills the search box.
pub fn render_page(env: &Environment<'_>, page: &Page, query: &str) -> Result<String, minijinja::Error> {
    let template = env.get_template(INDEX_TEMPLATE)?;
    template.render(context! {
        query => query,
        trending_wrapper_id => page.trending_wrapper.id(),
        trending_region_id => page.trending.name(),
        search_region_id => page.search.name(),
        trending_hidden => page.trending_wrapper.is_hidden(),
        trending_tiles => page.trending.tiles(),
        search_tiles => page.search.tiles(),
    })
}
