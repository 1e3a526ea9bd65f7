pub mod pointer;
pub mod render;
pub mod help;

use std::path::Path;
use tokio::time::Instant;
use tracing::{debug, warn};
use crate::app::App;

/// What the event loop should do after one input line
#[derive(Debug, PartialEq)]
pub enum Reply {
    /// Nothing to print
    Silent,
    /// A line for stdout
    Text(String),
    Quit,
}

/// Commands that change what a render would show
pub fn changes_state(command: &str) -> bool {
    matches!(
        command,
        "down" | "move" | "touch" | "up" | "click" | "leave" | "resize" | "size" | "view"
    )
}

pub fn handle_line(app: &mut App, line: &str, default_output: &Path, now: Instant) -> Reply {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Reply::Silent;
    }

    let command = parts[0].to_lowercase();
    let args = &parts[1..];
    debug!("Command {} {:?}", command, args);

    let result = match command.as_str() {
        "down" => pointer::down(app, args),
        "move" | "touch" => pointer::motion(app, args, now),
        "up" => pointer::up(app, args, now),
        "click" => pointer::click(app, args, now),
        "leave" => pointer::leave(app),
        "resize" | "size" => render::resize(app, args),
        "view" => render::view(app, args),
        "render" => render::render(app, args, default_output),
        "status" => render::status(app),
        "help" | "?" => help::execute(),
        "quit" | "exit" => return Reply::Quit,
        _ => Err(format!("Unknown command '{}'. Type help for the list", command)),
    };

    match result {
        Ok(Some(text)) => Reply::Text(text),
        Ok(None) => Reply::Silent,
        Err(e) => {
            warn!("❌ Error executing command {}: {}", command, e);
            Reply::Text(format!("❌ {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn run(app: &mut App, line: &str) -> Reply {
        handle_line(app, line, Path::new("chart.svg"), Instant::now())
    }

    #[test]
    fn test_blank_and_quit() {
        let mut app = App::new(&AppConfig::default());
        assert_eq!(run(&mut app, "   "), Reply::Silent);
        assert_eq!(run(&mut app, "quit"), Reply::Quit);
        assert_eq!(run(&mut app, "EXIT"), Reply::Quit);
    }

    #[test]
    fn test_errors_are_prefixed() {
        let mut app = App::new(&AppConfig::default());
        assert_eq!(
            run(&mut app, "frobnicate"),
            Reply::Text("❌ Unknown command 'frobnicate'. Type help for the list".to_string())
        );
        assert!(matches!(run(&mut app, "move 1"), Reply::Text(t) if t.starts_with("❌")));
        assert!(matches!(run(&mut app, "render"), Reply::Text(t) if t.starts_with("❌")));
        assert!(matches!(run(&mut app, "resize inf 100"), Reply::Text(t) if t.starts_with("❌")));
        assert_eq!(app.viewport(), AppConfig::default().viewport);
    }

    #[test]
    fn test_aliases_reach_the_app() {
        let mut app = App::new(&AppConfig::default());
        assert_eq!(run(&mut app, "size 800 600"), Reply::Text("Viewport is now 800x600".to_string()));
        assert_eq!(app.viewport().width, 800.0);
        assert_eq!(run(&mut app, "touch 10 10"), Reply::Silent);
        assert_eq!(run(&mut app, "view candlestick"), Reply::Text("View set to candlestick".to_string()));
        assert_eq!(run(&mut app, "status"), Reply::Text("Loading...".to_string()));
        assert!(changes_state("touch"));
        assert!(!changes_state("status"));
    }
}
