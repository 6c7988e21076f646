//! Password handling for CLI operations.

use rpassword::prompt_password;

/// Prompts for password confirmation
pub fn confirm_password() -> Option<String> {
    let pwd1 = match prompt_password("Enter archive password: ") {
        Ok(pwd) => pwd,
        Err(_) => return None,
    };

    if pwd1.is_empty() {
        eprintln!("Password cannot be empty");
        return None;
    }

    let pwd2 = match prompt_password("Confirm password: ") {
        Ok(pwd) => pwd,
        Err(_) => return None,
    };

    if pwd1 == pwd2 {
        Some(pwd1)
    } else {
        eprintln!("Passwords do not match");
        None
    }
}

/// Uses the provided password, or prompts with confirmation
pub fn get_or_prompt_password(provided: Option<String>) -> Option<String> {
    match provided {
        Some(pwd) if pwd.is_empty() => {
            eprintln!("Password cannot be empty");
            None
        }
        Some(pwd) => Some(pwd),
        None => confirm_password(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provided_password_is_used() {
        assert_eq!(
            get_or_prompt_password(Some("secret".to_string())),
            Some("secret".to_string())
        );
    }

    #[test]
    fn test_empty_password_rejected() {
        assert_eq!(get_or_prompt_password(Some(String::new())), None);
    }
}
