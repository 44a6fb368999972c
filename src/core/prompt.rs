use std::env;

use nix::unistd::gethostname;

/// `<hostname>(<user>)% `. A lookup that fails leaves its segment empty.
pub fn build_prompt() -> String {
    let hostname = gethostname()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let user = env::var("USER").unwrap_or_default();
    format_prompt(&hostname, &user)
}

pub fn format_prompt(hostname: &str, user: &str) -> String {
    format!("{}({})% ", hostname, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_prompt() {
        assert_eq!(format_prompt("box", "alice"), "box(alice)% ");
        assert_eq!(format_prompt("", ""), "()% ");
    }

    #[test]
    fn test_prompt_is_stable() {
        assert_eq!(build_prompt(), build_prompt());
    }

    #[test]
    fn test_prompt_shape() {
        let prompt = build_prompt();
        assert!(prompt.ends_with(")% "));
        assert!(prompt.contains('('));
    }
}
