//! Leaflet HTML map renderer.

use std::io::Write;
use std::path::{Path, PathBuf};

use askama::Template;
use tracing::info;

use super::{MapPoint, MapRenderer, RenderError};

/// Map files are named `route_map_<random>.html`.
const FILE_PREFIX: &str = "route_map_";
const FILE_SUFFIX: &str = ".html";

#[derive(Template)]
#[template(path = "route_map.html")]
struct RouteMapTemplate<'a> {
    title: &'a str,
    center_lat: f64,
    center_lon: f64,
    /// JSON array of points, safe to embed in a `<script>` block.
    points_json: String,
}

/// Writes routes as standalone HTML pages with a Leaflet map.
#[derive(Debug, Clone)]
pub struct HtmlMapRenderer {
    dir: PathBuf,
    title: String,
}

impl HtmlMapRenderer {
    /// Write maps into `dir`, one new file per render.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            title: "Route".to_string(),
        }
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Directory maps are written to.
    pub fn output_dir(&self) -> &Path {
        &self.dir
    }

    /// The page for `points`, or `None` if there is nothing to draw.
    pub fn render_html(&self, points: &[MapPoint]) -> Result<Option<String>, RenderError> {
        let Some(first) = points.first() else {
            return Ok(None);
        };

        let template = RouteMapTemplate {
            title: &self.title,
            center_lat: first.lat,
            center_lon: first.lon,
            points_json: script_json(points),
        };

        Ok(Some(template.render()?))
    }
}

impl MapRenderer for HtmlMapRenderer {
    fn render(&self, points: &[MapPoint]) -> Result<Option<PathBuf>, RenderError> {
        let Some(html) = self.render_html(points)? else {
            return Ok(None);
        };

        let io_error = |source: std::io::Error| RenderError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut file = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .suffix(FILE_SUFFIX)
            .tempfile_in(&self.dir)
            .map_err(io_error)?;
        file.write_all(html.as_bytes()).map_err(io_error)?;
        let (_, path) = file.keep().map_err(|e| io_error(e.error))?;

        info!(path = %path.display(), points = points.len(), "Map written");
        Ok(Some(path))
    }
}

/// JSON for an inline script: `</` is escaped so a label cannot close the
/// `<script>` element.
fn script_json(points: &[MapPoint]) -> String {
    serde_json::to_string(points)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;

    fn points() -> Vec<MapPoint> {
        vec![
            MapPoint::new(Coordinates::new(49.0584, 8.797), "Oberderdingen Freibad"),
            MapPoint::new(Coordinates::new(49.0259, 8.7533), "Knittlingen ZOB / Schule (14:44)"),
        ]
    }

    #[test]
    fn renders_markers() {
        let renderer = HtmlMapRenderer::new(".").with_title("Freibad to ZOB");
        let html = renderer.render_html(&points()).unwrap().unwrap();

        assert!(html.contains("<title>Freibad to ZOB</title>"));
        assert!(html.contains("Knittlingen ZOB / Schule (14:44)"));
        assert!(html.contains("setView([49.0584, 8.797]"));
    }

    #[test]
    fn empty_path_declines() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = HtmlMapRenderer::new(dir.path());

        assert_eq!(renderer.render(&[]).unwrap(), None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = HtmlMapRenderer::new(dir.path());

        let path = renderer.render(&points()).unwrap().unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("route_map_") && name.ends_with(".html"));

        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("Oberderdingen Freibad"));
    }

    #[test]
    fn each_render_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = HtmlMapRenderer::new(dir.path());

        let first = renderer
            .render(&[MapPoint::new(Coordinates::new(49.0, 8.4), "Marktplatz")])
            .unwrap()
            .unwrap();
        let second = renderer
            .render(&[MapPoint::new(Coordinates::new(49.1, 8.5), "Europaplatz")])
            .unwrap()
            .unwrap();

        assert_ne!(first, second);
        let first = std::fs::read_to_string(first).unwrap();
        let second = std::fs::read_to_string(second).unwrap();
        assert!(first.contains("Marktplatz") && !first.contains("Europaplatz"));
        assert!(second.contains("Europaplatz") && !second.contains("Marktplatz"));
    }

    #[test]
    fn labels_cannot_close_script() {
        let json = script_json(&[MapPoint::new(Coordinates::new(0.0, 0.0), "</script>")]);
        assert!(!json.contains("</script>"));
    }

    #[test]
    fn unwritable_output() {
        let renderer = HtmlMapRenderer::new("/nonexistent/dir");
        assert!(matches!(
            renderer.render(&points()),
            Err(RenderError::Io { .. })
        ));
    }
}
