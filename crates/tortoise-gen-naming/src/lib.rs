//! Naming conventions and helpers for tortoise-gen.
//!
//! This crate converts schema identifiers into Python identifiers and derives
//! the relation names the generated models rely on. It has no dependencies and
//! can be used by any other tortoise-gen crate.

// ============================================================================
// Word Splitting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Digit,
    Separator,
}

fn classify(ch: char) -> CharClass {
    if ch.is_uppercase() {
        CharClass::Upper
    } else if ch.is_alphabetic() {
        CharClass::Lower
    } else if ch.is_numeric() {
        CharClass::Digit
    } else {
        CharClass::Separator
    }
}

/// Split an identifier into words.
///
/// Words break on separators, on lower-to-upper transitions, before the last
/// capital of an acronym run followed by lowercase, and between letters and
/// digits.
///
/// # Examples
/// ```
/// use tortoise_gen_naming::split_words;
///
/// assert_eq!(split_words("createdAt"), vec!["created", "At"]);
/// assert_eq!(split_words("is18"), vec!["is", "18"]);
/// assert_eq!(split_words("HTMLParser"), vec!["HTML", "Parser"]);
/// assert_eq!(split_words("user_profile-v2"), vec!["user", "profile", "v", "2"]);
/// ```
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        let class = classify(ch);
        if class == CharClass::Separator {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let prev_class = classify(prev);
            let next_class = chars.get(i + 1).map(|&c| classify(c));
            let boundary = match (prev_class, class) {
                (CharClass::Lower, CharClass::Upper) => true,
                (CharClass::Upper, CharClass::Upper) => next_class == Some(CharClass::Lower),
                (CharClass::Digit, CharClass::Upper | CharClass::Lower) => true,
                (CharClass::Upper | CharClass::Lower, CharClass::Digit) => true,
                _ => false,
            };
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

// ============================================================================
// Case Conversion
// ============================================================================

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert an identifier to snake_case.
///
/// # Examples
/// ```
/// use tortoise_gen_naming::to_snake_case;
///
/// assert_eq!(to_snake_case("createdAt"), "created_at");
/// assert_eq!(to_snake_case("is18"), "is_18");
/// assert_eq!(to_snake_case("User_successor"), "user_successor");
/// ```
pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Convert an identifier to PascalCase.
///
/// # Examples
/// ```
/// use tortoise_gen_naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("user"), "User");
/// assert_eq!(to_pascal_case("user_profile"), "UserProfile");
/// assert_eq!(to_pascal_case("UserProfile"), "UserProfile");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert an identifier to SCREAMING_SNAKE_CASE.
pub fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

// ============================================================================
// Relation Naming
// ============================================================================

/// Default foreign-key column for a relation that does not name one.
///
/// # Examples
/// ```
/// use tortoise_gen_naming::foreign_key_column;
///
/// assert_eq!(foreign_key_column("author"), "author_id");
/// assert_eq!(foreign_key_column("parentPost"), "parent_post_id");
/// ```
pub fn foreign_key_column(relation: &str) -> String {
    format!("{}_id", to_snake_case(relation))
}

/// Attribute the ORM adds next to a relation to expose the raw key value.
pub fn foreign_key_attribute(relation_attr: &str) -> String {
    format!("{}_id", relation_attr)
}

/// Default reverse accessor name for a relation that does not declare one.
///
/// # Examples
/// ```
/// use tortoise_gen_naming::build_related_name;
///
/// assert_eq!(build_related_name("User", "successor"), "user_successor");
/// assert_eq!(build_related_name("Post", "user"), "post_user");
/// ```
pub fn build_related_name(source_entity: &str, relation: &str) -> String {
    to_snake_case(&format!("{}_{}", source_entity, relation))
}

/// Qualified model reference used by relation declarations (`app.Model`).
pub fn build_model_reference(app_name: &str, class_name: &str) -> String {
    format!("{}.{}", app_name, class_name)
}
