/// Hard ceiling for outbound message length, in characters.
pub const MAX_SMS_CHARS: usize = 160;

/// Capability output that breaks the message contract. Surfaced to the
/// caller, never repaired in place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("composed message is empty")]
    EmptyMessage,
    #[error("composed message is {length} characters; the SMS limit is 160")]
    MessageTooLong { length: usize },
    #[error("composed message contains unresolved placeholder {token:?}")]
    UnresolvedPlaceholder { token: String },
}

/// Gate applied to every composed message before a result is surfaced.
pub fn validate_sms(message: &str) -> Result<(), ContractViolation> {
    if message.trim().is_empty() {
        return Err(ContractViolation::EmptyMessage);
    }

    let length = message.chars().count();
    if length > MAX_SMS_CHARS {
        return Err(ContractViolation::MessageTooLong { length });
    }

    if let Some(token) = unresolved_placeholder(message) {
        return Err(ContractViolation::UnresolvedPlaceholder { token });
    }

    Ok(())
}

/// Detects the bracketed merge fields and "insert ..." stubs that template
/// composers leave behind when a value never resolved.
fn unresolved_placeholder(message: &str) -> Option<String> {
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let Some(start) = message.find(open) {
            let token = match message[start + 1..].find(close) {
                Some(relative_end) => &message[start..=start + 1 + relative_end],
                // A dangling opener is still template residue.
                None => return Some(message[start..].chars().take(16).collect()),
            };
            return Some(token.to_string());
        }
    }

    if message.to_lowercase().contains("insert") {
        return Some("insert".to_string());
    }

    None
}
