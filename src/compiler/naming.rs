//! Identifier casing for generated code
//!
//! Generated files reference the same definition under several conventions:
//! `contact form` becomes `contact-form.tsx`, `ContactForm`, and
//! `contactFormSchema`. All converters run off the same word split so the
//! variants always agree.

fn words(raw: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            // Split camelCase boundaries as well as separators.
            if ch.is_ascii_uppercase() && !current.is_empty() {
                let last_lower = current.chars().last().is_some_and(|c| c.is_ascii_lowercase());
                if last_lower {
                    out.push(std::mem::take(&mut current));
                }
            }
            current.push(ch.to_ascii_lowercase());
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    if out.is_empty() {
        out.push("generated".to_string());
    }
    out
}

pub fn to_pascal_case(raw: &str) -> String {
    words(raw)
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn to_camel_case(raw: &str) -> String {
    let pascal = to_pascal_case(raw);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => pascal,
    }
}

pub fn to_kebab_case(raw: &str) -> String {
    words(raw).join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversions_agree() {
        assert_eq!(to_pascal_case("contact form"), "ContactForm");
        assert_eq!(to_camel_case("contact form"), "contactForm");
        assert_eq!(to_kebab_case("contact form"), "contact-form");
    }

    #[test]
    fn test_camel_case_input() {
        assert_eq!(to_kebab_case("userProfile"), "user-profile");
        assert_eq!(to_pascal_case("userProfile"), "UserProfile");
    }

    #[test]
    fn test_punctuation_and_empty() {
        assert_eq!(to_pascal_case("my!! table"), "MyTable");
        assert_eq!(to_kebab_case(""), "generated");
    }
}
