//! XPath expressions for finding page elements by role and accessible name.
//!
//! headless_chrome only resolves CSS and XPath, so lookups such as
//! "the button named Aplicar" are spelled out here.

/// Quote a string as an XPath literal
pub fn literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }

    // Both quote kinds present: stitch single-quoted pieces together
    let pieces: Vec<String> = text
        .split('\'')
        .map(|piece| format!("'{}'", piece))
        .collect();
    format!("concat({})", pieces.join(", \"'\", "))
}

/// A button whose visible text or aria-label is `name`
pub fn button_named(name: &str) -> String {
    let name = literal(name);
    format!(
        "//button[normalize-space(.)={name} or @aria-label={name}] | //*[@role='button'][normalize-space(.)={name} or @aria-label={name}]",
        name = name
    )
}

/// An element labelled `label` inside the navigation landmark labelled `navigation`
pub fn labelled_within_navigation(navigation: &str, label: &str) -> String {
    let navigation = literal(navigation);
    let label = literal(label);
    format!(
        "//*[self::nav or @role='navigation'][@aria-label={navigation}]//*[@aria-label={label} or normalize-space(text())={label}]",
        navigation = navigation,
        label = label
    )
}

/// A search input whose aria-label or placeholder is `name`
pub fn searchbox_named(name: &str) -> String {
    let name = literal(name);
    format!(
        "//*[@role='searchbox' or (self::input and @type='search')][@aria-label={name} or @placeholder={name}]",
        name = name
    )
}

/// The innermost element whose normalized text content is exactly `text`
pub fn exact_text(text: &str) -> String {
    let text = literal(text);
    format!(
        "//*[normalize-space(.)={text}][not(*[normalize-space(.)={text}])]",
        text = text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_quoting() {
        assert_eq!(literal("Aplicar"), "'Aplicar'");
        assert_eq!(literal("l'Hospitalet"), "\"l'Hospitalet\"");
        assert_eq!(literal(r#"a'b"c"#), r#"concat('a', "'", 'b"c')"#);
    }

    #[test]
    fn test_button_named() {
        let xpath = button_named("Aceptar todo");
        assert!(xpath.starts_with("//button[normalize-space(.)='Aceptar todo'"));
        assert!(xpath.contains("@aria-label='Aceptar todo'"));
        assert!(xpath.contains("@role='button'"));
    }

    #[test]
    fn test_labelled_within_navigation() {
        let xpath = labelled_within_navigation("All Categories", "Coches");
        assert_eq!(
            xpath,
            "//*[self::nav or @role='navigation'][@aria-label='All Categories']//*[@aria-label='Coches' or normalize-space(text())='Coches']"
        );
    }

    #[test]
    fn test_searchbox_and_text() {
        assert!(searchbox_named("¿Dónde?").contains("@placeholder='¿Dónde?'"));
        assert_eq!(
            exact_text("España"),
            "//*[normalize-space(.)='España'][not(*[normalize-space(.)='España'])]"
        );
    }
}
