//! Rendering of stage errors for the terminal

use owo_colors::{OwoColorize, Stream};
use pascoc::PascocError;
use std::path::Path;

/// Renders an error as `<path>:(line, column) message`, highlighting the location
/// when stderr supports colours
pub fn render(path: &Path, error: &PascocError) -> String {
    let message = error.to_string();
    match error.position() {
        Some(position) => {
            let location = format!("{}:{position}", path.display());
            let rest = message
                .strip_prefix(&position.to_string())
                .map(str::trim_start)
                .unwrap_or(&message);
            format!(
                "{} {}",
                location.if_supports_color(Stream::Stderr, |text| text.red()),
                rest
            )
        }
        None => format!(
            "{}: {}",
            path.display().if_supports_color(Stream::Stderr, |text| text.red()),
            message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pascoc::Pascoc;

    #[test]
    fn test_render_positioned() {
        let path = Path::new("test.pas");
        let error = Pascoc::builder()
            .build()
            .check_reader(path, "begin y := 1 end.".as_bytes())
            .unwrap_err();
        let rendered = render(path, &error);
        assert!(rendered.contains("test.pas:(1, 7)"), "{rendered}");
        assert!(rendered.ends_with(" Identifier 'y' is undeclared"), "{rendered}");
    }

    #[test]
    fn test_render_io() {
        let path = Path::new("/definitely/not/here.pas");
        let error = Pascoc::builder().build().check(path).unwrap_err();
        let rendered = render(path, &error);
        assert!(rendered.contains("here.pas"), "{rendered}");
    }
}
