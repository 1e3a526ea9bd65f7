pub fn execute() -> Result<Option<String>, String> {
    let text = [
        "📖 ticker-charts commands",
        "  down X Y        press the pointer at viewport pixel X Y",
        "  move X Y        move the pointer (alias: touch)",
        "  up X Y          release the pointer",
        "  click X Y       press and release in place; on the overview this resets the brush",
        "  leave           pointer left the chart, hides the tooltip",
        "  resize W H      change the viewport size (alias: size)",
        "  view NAME       brush, line or candlestick",
        "  render [PATH]   draw the current view (.svg or bitmap by extension)",
        "  status          show the current window, scales and tooltip",
        "  help            show this message",
        "  quit            exit (alias: exit)",
    ];
    Ok(Some(text.join("\n")))
}
