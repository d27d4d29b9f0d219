//! Landing page: the three exhibit objects

use super::render::{escape, interact_url};
use nafm_common::navigation::PageUrl;
use nafm_common::ObjectId;

pub fn render() -> String {
    let landing = PageUrl::landing();
    let cards: String = ObjectId::ALL
        .iter()
        .map(|object| {
            let section = object.section();
            format!(
                r#"<a class="object-item" data-object="{id}" data-section="{section}" href="{href}">
<span class="object-icon">{icon}</span>
<h3>{name}</h3>
<p>{description}</p>
</a>"#,
                id = object.as_str(),
                section = section.as_str(),
                href = escape(&interact_url(
                    "pick",
                    &landing,
                    &[("object", object.as_str().to_string())]
                )),
                icon = section.default_icon(),
                name = escape(object.display_name()),
                description = escape(section.default_description()),
            )
        })
        .collect();

    format!(
        r#"<section class="welcome">
<h1>Welcome to the Nigerian Air Force Museum</h1>
<p>Lift an object from its stand to begin, or touch one below.</p>
</section>
<section class="objects-grid" id="objects-grid">
{}
</section>"#,
        cards
    )
}
