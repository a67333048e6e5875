//! Подготовка промптов и разбор ответов модели

use crate::shared::format::truncate_chars;

/// Подставить значения в шаблон вида `{{product_name}}`
///
/// Неизвестные плейсхолдеры остаются как есть, значения `None` заменяются пустой строкой.
pub fn render_template(template: &str, vars: &[(&str, Option<&str>)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    // Один проход слева направо: подставленные значения повторно не разбираются
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match vars.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value.unwrap_or("")),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

/// Найти JSON-объект в ответе модели: в ```json блоке или «голый»
pub fn extract_json(content: &str) -> Option<serde_json::Value> {
    let trimmed = content.trim();

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after[body_start..];
        if let Some(end) = body.find("```") {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(body[..end].trim()) {
                if value.is_object() {
                    return Some(value);
                }
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<serde_json::Value>(&trimmed[start..=end])
        .ok()
        .filter(|v| v.is_object())
}

/// Название: первая непустая строка, без кавычек и префиксов, не длиннее `max_len` символов
pub fn clean_title(raw: &str, max_len: usize) -> String {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");

    let line = ["Título:", "Titulo:", "Title:"]
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
        .unwrap_or(line)
        .trim();

    let quotes: &[char] = &['"', '\'', '«', '»', '“', '”', '`', '*'];
    let line = line.trim_matches(quotes).trim();

    truncate_chars(line, max_len).trim_end().to_string()
}

/// Описание: оставить безопасный HTML (абзацы, списки, выделение)
pub fn clean_description(raw: &str) -> String {
    let body = match extract_fenced(raw) {
        Some(inner) => inner,
        None => raw.trim(),
    };
    ammonia::Builder::default()
        .tags(allowed_tags())
        .clean(body)
        .to_string()
        .trim()
        .to_string()
}

fn allowed_tags() -> std::collections::HashSet<&'static str> {
    ["p", "br", "ul", "ol", "li", "strong", "b", "em", "i", "h2", "h3"]
        .into_iter()
        .collect()
}

fn extract_fenced(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after = &raw[start + 3..];
    let body_start = after.find('\n').map(|i| i + 1)?;
    let body = &after[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let out = render_template(
            "Produto: {{product_name}} / {{brand}} / {{unknown}} / {{ref_id}}",
            &[
                ("product_name", Some("Tênis")),
                ("brand", None),
                ("ref_id", Some("R1")),
            ],
        );
        assert_eq!(out, "Produto: Tênis /  / {{unknown}} / R1");
    }

    #[test]
    fn test_render_template_does_not_expand_values() {
        let out = render_template(
            "{{product_name}}|{{brand}}",
            &[("product_name", Some("X {{brand}}")), ("brand", Some("Nike"))],
        );
        assert_eq!(out, "X {{brand}}|Nike");
        assert_eq!(render_template("a {{brand", &[("brand", Some("N"))]), "a {{brand");
    }

    #[test]
    fn test_extract_json_fenced_and_bare() {
        let fenced = "Segue:\n```json\n{\"cor\": \"azul\"}\n```\nfim";
        assert_eq!(extract_json(fenced).unwrap()["cor"], "azul");

        let bare = "Resultado {\"itens\": [1, 2]} ok";
        assert_eq!(extract_json(bare).unwrap()["itens"][1], 2);

        assert!(extract_json("sem json aqui").is_none());
        assert!(extract_json("} {").is_none());
    }

    #[test]
    fn test_extract_json_requires_object() {
        assert!(extract_json("```json\n[1, 2]\n```").is_none());
        assert!(extract_json("[1, 2]").is_none());
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(
            clean_title("\n  Título: \"Tênis Corrida Azul\"  \nexplicação", 150),
            "Tênis Corrida Azul"
        );
        assert_eq!(clean_title("Calçado Esportivo", 4), "Calç");
        assert_eq!(clean_title("   ", 10), "");
    }

    #[test]
    fn test_clean_description_strips_scripts() {
        let html = "```html\n<p>Bom</p><script>alert(1)</script><div>x</div>\n```";
        assert_eq!(clean_description(html), "<p>Bom</p>x");
    }
}
