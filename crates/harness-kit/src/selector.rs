//! Selector list helpers shared by predicates and the mock tree.

use crate::result::{HarnessError, HarnessResult};

/// Split a comma-separated selector list into its alternatives.
///
/// Commas inside `[...]`, `(...)` or quoted strings do not split.
pub fn split_selector_groups(selector: &str) -> HarnessResult<Vec<String>> {
    let invalid = |message: &str| HarnessError::InvalidSelector {
        selector: selector.to_string(),
        message: message.to_string(),
    };

    let mut groups = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in selector.chars() {
        if let Some(open) = quote {
            current.push(ch);
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                bracket_depth = bracket_depth
                    .checked_sub(1)
                    .ok_or_else(|| invalid("unbalanced ']'"))?;
                current.push(ch);
            }
            '(' => {
                paren_depth += 1;
                current.push(ch);
            }
            ')' => {
                paren_depth = paren_depth
                    .checked_sub(1)
                    .ok_or_else(|| invalid("unbalanced ')'"))?;
                current.push(ch);
            }
            ',' if bracket_depth == 0 && paren_depth == 0 => {
                let trimmed = current.trim();
                if trimmed.is_empty() {
                    return Err(invalid("empty selector in list"));
                }
                groups.push(trimmed.to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if quote.is_some() {
        return Err(invalid("unterminated string"));
    }
    if bracket_depth != 0 || paren_depth != 0 {
        return Err(invalid("unclosed bracket"));
    }

    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty selector in list"));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

/// Prefix every alternative of `host` with every alternative of `ancestor`.
///
/// `combine_selectors(".a, .b", "x, y")` is `".a x, .a y, .b x, .b y"`.
pub fn combine_selectors(ancestor: &str, host: &str) -> HarnessResult<String> {
    let hosts = split_selector_groups(host)?;
    let ancestors = split_selector_groups(ancestor)?;
    let combined: Vec<String> = ancestors
        .iter()
        .flat_map(|ancestor| hosts.iter().map(move |host| format!("{ancestor} {host}")))
        .collect();
    Ok(combined.join(", "))
}
