// src/cli/list.rs
use crate::forms::resources::FormRegistry;

pub fn render(registry: &FormRegistry) -> String {
    let mut out = String::new();
    for (category, schemas) in registry.by_category() {
        out.push_str(&format!("{}\n", category.as_deref().unwrap_or("Uncategorized")));
        for schema in schemas {
            out.push_str(&format!(
                "  {:<24} {} ({} field(s), {} table(s))\n",
                schema.form_id,
                schema.title,
                schema.fields.len(),
                schema.sections.len()
            ));
        }
    }
    out
}

pub fn run(registry: &FormRegistry) {
    print!("{}", render(registry));
}
