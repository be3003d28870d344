use crate::app::command_support::{load_cli_settings, map_config_err};
use crate::templates::{TemplateCatalog, IMPORT_MEDIA_TYPE};

pub fn cmd_templates(args: &[String]) -> Result<String, String> {
    if let Some(extra) = args.first() {
        return Err(format!("unexpected argument `{extra}`"));
    }
    let settings = load_cli_settings()?;
    let catalog = settings.catalog().map_err(map_config_err)?;
    Ok(render_catalog(&catalog))
}

fn render_catalog(catalog: &TemplateCatalog) -> String {
    let mut lines: Vec<String> = catalog
        .entries()
        .iter()
        .enumerate()
        .map(|(index, template)| format!("template.{index}={} {}", template.id, template.name))
        .collect();
    lines.push(format!("import_slot={}", catalog.import_slot()));
    lines.push(format!("import_media_type={IMPORT_MEDIA_TYPE}"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_renders_one_line_per_template() {
        let rendered = render_catalog(&TemplateCatalog::default());
        assert!(rendered.contains("template.0=1 Empty"));
        assert!(rendered.contains("template.3=4 Import"));
        assert!(rendered.contains("import_slot=3"));
        assert!(rendered.contains("import_media_type=application/json"));
    }
}
