use std::path::{Path, PathBuf};
use crate::app::{App, ChartType};
use crate::models::Viewport;

pub fn render(app: &App, args: &[&str], default_output: &Path) -> Result<Option<String>, String> {
    let path = match args {
        [] => default_output.to_path_buf(),
        [path] => PathBuf::from(path),
        _ => return Err("Usage: render [PATH]".to_string()),
    };
    app.render(&path)?;
    Ok(Some(format!("🖼️ Rendered {} view to {}", app.view(), path.display())))
}

pub fn view(app: &mut App, args: &[&str]) -> Result<Option<String>, String> {
    let [name] = args else {
        return Err("Usage: view brush|line|candlestick".to_string());
    };
    let view: ChartType = name.parse()?;
    app.set_view(view);
    Ok(Some(format!("View set to {}", view)))
}

pub fn resize(app: &mut App, args: &[&str]) -> Result<Option<String>, String> {
    let [width, height] = args else {
        return Err("Usage: resize WIDTH HEIGHT".to_string());
    };
    let width: f64 = width.parse().map_err(|_| format!("Invalid width '{}'", width))?;
    let height: f64 = height.parse().map_err(|_| format!("Invalid height '{}'", height))?;
    app.resize(Viewport { width, height })?;
    Ok(Some(format!("Viewport is now {}x{}", width, height)))
}

pub fn status(app: &App) -> Result<Option<String>, String> {
    Ok(Some(app.status()))
}
