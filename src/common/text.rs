// src/common/text.rs
// Normalizações de texto usadas na borda da API (slugs, telefones, valores).

use std::str::FromStr;

use rust_decimal::Decimal;
use validator::ValidationError;

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// "Dra. Ana Luíza" -> "dra-ana-luiza"
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars().flat_map(char::to_lowercase).map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

// Validador customizado para o `validator`
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_slug").with_message("invalid_slug".into()))
    }
}

/// Primeiro slug livre na sequência `base`, `base-2`, `base-3`...
pub fn pick_unique_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Mantém só os dígitos: "(11) 99999-8888" -> "11999998888"
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}

/// Texto vazio (ou só espaços) vira None.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lê valores no formato das planilhas brasileiras.
/// Aceita "R$ 1.234,56", "-1.234,56", "(1.234,56)" e também "1234.56".
pub fn parse_br_decimal(raw: &str) -> Option<Decimal> {
    let mut text: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut negative = false;
    if text.starts_with('(') && text.ends_with(')') && text.len() > 2 {
        negative = true;
        text = text[1..text.len() - 1].to_string();
    }
    if let Some(rest) = text.strip_prefix('-') {
        negative = !negative;
        text = rest.trim_start_matches("R$").to_string();
    }
    if text.is_empty() {
        return None;
    }

    let last_dot = text.rfind('.');
    let last_comma = text.rfind(',');

    let canonical = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => text.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => text.replace(',', ""),
        (None, Some(_)) => text.replace(',', "."),
        (Some(dot), None) => {
            let decimals = text.len() - dot - 1;
            if text.matches('.').count() > 1 || decimals == 3 {
                text.replace('.', "")
            } else {
                text
            }
        }
        (None, None) => text,
    };

    let value = Decimal::from_str(&canonical).ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn slugify_folds_accents_and_separators() {
        assert_eq!(slugify("Dra. Ana Luíza"), "dra-ana-luiza");
        assert_eq!(slugify("  Clínica   São João!! "), "clinica-sao-joao");
        assert_eq!(slugify("Ortopedia & Traumatologia 2025"), "ortopedia-traumatologia-2025");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("dr-joao-2"));
        assert!(!is_valid_slug("Dr-Joao"));
        assert!(!is_valid_slug("-joao"));
        assert!(!is_valid_slug("joao--silva"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn unique_slug_appends_counter() {
        assert_eq!(pick_unique_slug("dra-ana", &[]), "dra-ana");
        let taken = vec!["dra-ana".to_string(), "dra-ana-2".to_string()];
        assert_eq!(pick_unique_slug("dra-ana", &taken), "dra-ana-3");
    }

    #[test]
    fn phone_keeps_digits_only() {
        assert_eq!(normalize_phone("+55 (11) 99999-8888"), "5511999998888");
        assert_eq!(normalize_phone("abc"), "");
    }

    #[test]
    fn url_check() {
        assert!(is_http_url("https://wa.me/5511999998888"));
        assert!(is_http_url("http://clinica.com"));
        assert!(!is_http_url("javascript:alert(1)"));
        assert!(!is_http_url("https://"));
    }

    #[test]
    fn brazilian_amounts() {
        assert_eq!(parse_br_decimal("R$ 1.234,56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_br_decimal("-1.234,56"), Some(Decimal::new(-123456, 2)));
        assert_eq!(parse_br_decimal("(350,00)"), Some(Decimal::new(-35000, 2)));
        assert_eq!(parse_br_decimal("1234.56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_br_decimal("1.500"), Some(Decimal::new(1500, 0)));
        assert_eq!(parse_br_decimal("1,234.50"), Some(Decimal::new(123450, 2)));
        assert_eq!(parse_br_decimal("R$ -80"), Some(Decimal::new(-80, 0)));
        assert_eq!(parse_br_decimal("abc"), None);
        assert_eq!(parse_br_decimal(""), None);
    }
}
