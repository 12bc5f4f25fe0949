//! Plain-text rendering of a [`DisplayState`] for the terminal.

use vitrina_core::view::{DisplayState, ItemFragment};

pub fn render_text(display: &DisplayState) -> String {
    let mut lines = vec![format!("Products ({})", display.count)];

    if display.placeholder_visible() {
        let placeholder = display.placeholder.as_deref().unwrap_or_default();
        lines.push(format!("  {placeholder}"));
        return lines.join("\n");
    }

    for item in &display.items {
        lines.extend(render_item(item));
    }
    lines.join("\n")
}

fn render_item(item: &ItemFragment) -> [String; 3] {
    [
        format!("  - {}  {}", item.name, item.price_label),
        format!("    {}", item.description),
        format!(
            "    {}  [{}: `delete {}`]",
            item.id_label, item.delete.label, item.delete.product_id
        ),
    ]
}
