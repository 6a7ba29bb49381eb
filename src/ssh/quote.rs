//! POSIX shell quoting for values interpolated into remote command lines.

/// Quote `arg` so a POSIX shell reads it back as one literal word.
///
/// Words made only of characters the shell never interprets are returned
/// unchanged, so `docker inspect web` stays readable in logs.
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    if arg.chars().all(is_shell_safe) {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', "'\"'\"'"))
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}
