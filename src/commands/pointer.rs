use tokio::time::Instant;
use crate::app::App;

fn parse_coord(value: &str, name: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| format!("Invalid {} coordinate '{}'", name, value))?;
    if !parsed.is_finite() {
        return Err(format!("Invalid {} coordinate '{}'", name, value));
    }
    Ok(parsed)
}

/// Parse the `X Y` pair every pointer command takes
pub fn parse_point(args: &[&str]) -> Result<(f64, f64), String> {
    match args {
        [x, y] => Ok((parse_coord(x, "x")?, parse_coord(y, "y")?)),
        _ => Err("Usage: <command> X Y".to_string()),
    }
}

pub fn down(app: &mut App, args: &[&str]) -> Result<Option<String>, String> {
    let (x, y) = parse_point(args)?;
    app.pointer_down(x, y);
    Ok(None)
}

pub fn motion(app: &mut App, args: &[&str], now: Instant) -> Result<Option<String>, String> {
    let (x, y) = parse_point(args)?;
    app.pointer_move(x, y, now);
    Ok(None)
}

pub fn up(app: &mut App, args: &[&str], now: Instant) -> Result<Option<String>, String> {
    let (x, y) = parse_point(args)?;
    app.pointer_up(x, y, now);
    Ok(None)
}

pub fn click(app: &mut App, args: &[&str], now: Instant) -> Result<Option<String>, String> {
    let (x, y) = parse_point(args)?;
    app.click(x, y, now);
    Ok(None)
}

pub fn leave(app: &mut App) -> Result<Option<String>, String> {
    app.pointer_leave();
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point(&["10", "20.5"]).unwrap(), (10.0, 20.5));
        assert!(parse_point(&["10"]).is_err());
        assert!(parse_point(&["10", "abc"]).is_err());
        assert!(parse_point(&["NaN", "1"]).is_err());
    }
}
