//! SVG rendering of a diagram snapshot.

use std::{fs::File, io::Write};

use log::{debug, error, info};
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use tapeloom_core::{color::Color, curve::EdgeGeometry, geometry::Point};

use super::{Error, Exporter};
use crate::{
    config::StyleConfig,
    diagram::{Diagram, DiagramEdge, DiagramNode, Terminal, TransitionDisplay},
    model::BLANK_GLYPH,
};

/// Space left around the content.
const MARGIN: f32 = 50.0;
const FONT_SIZE: u16 = 14;
const FONT_FAMILY: &str = "sans-serif";
/// Radius of the inner ring of final states, relative to the node radius.
const INNER_RING_RATIO: f32 = 0.8;
/// Length of the initial-state chevron strokes.
const CHEVRON_SIZE: f32 = 15.0;

/// Builder for [`Svg`] exporters.
pub struct SvgBuilder<'a> {
    file_name: String,
    style: Option<&'a StyleConfig>,
}

impl<'a> SvgBuilder<'a> {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::Render`] if the configured background color is invalid.
    pub fn build(self) -> Result<Svg, Error> {
        let background = match self.style {
            Some(style) => style.background_color().map_err(Error::Render)?,
            None => None,
        };

        Ok(Svg {
            file_name: self.file_name,
            background,
        })
    }
}

/// SVG exporter writing to a single file.
#[derive(Debug)]
pub struct Svg {
    file_name: String,
    background: Option<Color>,
}

impl Svg {
    /// Renders the whole diagram: edges first, so nodes are drawn on top.
    pub fn render_diagram(&self, diagram: &Diagram) -> Document {
        let (min, max) = self.calculate_content_bounds(diagram);
        let x = min.x() - MARGIN;
        let y = min.y() - MARGIN;
        let width = max.x() - min.x() + 2.0 * MARGIN;
        let height = max.y() - min.y() + 2.0 * MARGIN;
        debug!(width, height; "Final SVG dimensions");

        let mut doc = Document::new()
            .set("viewBox", format!("{x} {y} {width} {height}"))
            .set("width", width)
            .set("height", height);

        if let Some(color) = &self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", color),
            );
        }

        for (id, edge) in diagram.edges() {
            if let Some(geometry) = diagram.edge_geometry(id) {
                doc = doc.add(self.render_edge(edge, &geometry));
            }
        }
        let radius = diagram.style().node_radius();
        for (_, node) in diagram.nodes() {
            doc = doc.add(self.render_node(node, radius));
        }

        doc
    }

    /// Renders the diagram into an SVG string.
    pub fn render_to_string(&self, diagram: &Diagram) -> String {
        self.render_diagram(diagram).to_string()
    }

    fn render_node(&self, node: &DiagramNode, radius: f32) -> svg_element::Group {
        let center = node.position();
        let stroke_width = if node.is_selected() { 3.0 } else { 1.5 };

        let mut group = svg_element::Group::new().add(
            svg_element::Circle::new()
                .set("cx", center.x())
                .set("cy", center.y())
                .set("r", radius)
                .set("fill", "white")
                .set("stroke", "black")
                .set("stroke-width", stroke_width),
        );

        if node.terminal() != Terminal::None {
            group = group.add(
                svg_element::Circle::new()
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("r", radius * INNER_RING_RATIO)
                    .set("fill", "none")
                    .set("stroke", "black"),
            );
        }

        if node.terminal() == Terminal::Accepting {
            let check = format!(
                "M {} {} L {} {} L {} {}",
                center.x() - radius / 2.0,
                center.y() + radius / 6.0,
                center.x() - radius / 8.0,
                center.y() + radius / 2.0,
                center.x() + radius / 2.0,
                center.y() - radius / 3.0
            );
            group = group.add(
                svg_element::Path::new()
                    .set("d", check)
                    .set("fill", "none")
                    .set("stroke", "green")
                    .set("stroke-width", 2),
            );
        }

        if node.is_initial() {
            let tip = center.add_point(Point::new(-radius, 0.0));
            for dy in [-CHEVRON_SIZE, CHEVRON_SIZE] {
                group = group.add(line(
                    tip.add_point(Point::new(-CHEVRON_SIZE, dy)),
                    tip,
                    "black",
                ));
            }
        }

        group.add(
            svg_element::Text::new("")
                .set("x", center.x())
                .set("y", center.y())
                .set("text-anchor", "middle")
                .set("dominant-baseline", "central")
                .set("font-family", FONT_FAMILY)
                .set("font-size", FONT_SIZE)
                .add(SvgText::new(node.name())),
        )
    }

    fn render_edge(&self, edge: &DiagramEdge, geometry: &EdgeGeometry) -> svg_element::Group {
        let stroke_width = if edge.is_selected() { 3.0 } else { 1.5 };

        let mut group = svg_element::Group::new().add(
            svg_element::Path::new()
                .set("d", geometry.curve().path_data())
                .set("fill", "none")
                .set("stroke", "black")
                .set("stroke-width", stroke_width),
        );
        for (from, to) in geometry.arrow().segments() {
            group = group.add(line(from, to, "black"));
        }

        group.add(self.render_label(edge.display(), geometry))
    }

    /// The transition label: colored read sets, then colored action glyphs.
    fn render_label(
        &self,
        display: &TransitionDisplay,
        geometry: &EdgeGeometry,
    ) -> svg_element::Text {
        let position = geometry.label().position();
        let mut text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", FONT_FAMILY)
            .set("font-size", FONT_SIZE)
            .set(
                "transform",
                format!(
                    "rotate({} {} {})",
                    geometry.label().angle_degrees(),
                    position.x(),
                    position.y()
                ),
            );

        let heads = display.tapes().flat_map(|(_, heads)| heads.iter());
        for (index, head) in heads.enumerate() {
            let content = if index == 0 {
                head.label()
            } else {
                format!(" {}", head.label())
            };
            text = text.add(tspan(&content, &head.color()));
        }

        text = text.add(SvgText::new(" / "));
        if display.actions().is_empty() {
            text = text.add(SvgText::new(BLANK_GLYPH));
        }
        for (index, action) in display.actions().iter().enumerate() {
            let content = if index == 0 {
                action.glyph()
            } else {
                format!(" {}", action.glyph())
            };
            text = text.add(tspan(&content, &action.color()));
        }

        text
    }

    /// Smallest box holding every node, control point and label anchor.
    fn calculate_content_bounds(&self, diagram: &Diagram) -> (Point, Point) {
        let radius = diagram.style().node_radius();
        let node_extents = diagram.nodes().flat_map(|(_, node)| {
            let center = node.position();
            let reach = if node.is_initial() {
                radius + CHEVRON_SIZE
            } else {
                radius
            };
            [
                center.add_point(Point::new(-reach, -radius)),
                center.add_point(Point::new(radius, radius)),
            ]
        });
        let edge_extents = diagram.edges().flat_map(|(id, _)| {
            let mut points = Vec::new();
            if let Some(geometry) = diagram.edge_geometry(id) {
                let curve = geometry.curve();
                points.extend([
                    curve.start(),
                    curve.control1(),
                    curve.control2(),
                    curve.end(),
                    geometry.label().position(),
                ]);
            }
            points
        });

        let mut points = node_extents.chain(edge_extents);
        let Some(first) = points.next() else {
            return (Point::default(), Point::default());
        };
        points.fold((first, first), |(min, max), point| {
            (
                Point::new(min.x().min(point.x()), min.y().min(point.y())),
                Point::new(max.x().max(point.x()), max.y().max(point.y())),
            )
        })
    }

    /// Writes an SVG document to the configured file.
    pub fn write_document(&self, doc: Document) -> Result<(), Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name = self.file_name, err:err; "Failed to create SVG file");
                return Err(Error::Io(err));
            }
        };

        if let Err(err) = write!(&f, "{doc}") {
            error!(file_name = self.file_name, err:err; "Failed to write SVG content");
            return Err(Error::Io(err));
        }

        Ok(())
    }
}

impl Exporter for Svg {
    fn export_diagram(&mut self, diagram: &Diagram) -> Result<(), Error> {
        let doc = self.render_diagram(diagram);
        debug!(nodes = diagram.node_count(), edges = diagram.edge_count(); "SVG document rendered");

        self.write_document(doc)
    }
}

fn line(from: Point, to: Point, stroke: &str) -> svg_element::Line {
    svg_element::Line::new()
        .set("x1", from.x())
        .set("y1", from.y())
        .set("x2", to.x())
        .set("y2", to.y())
        .set("stroke", stroke)
        .set("stroke-width", 1.5)
}

fn tspan(content: &str, color: &Color) -> svg_element::TSpan {
    svg_element::TSpan::new("")
        .set("fill", color)
        .add(SvgText::new(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        editor::Editor,
        machine::Machine,
        model::{ActionKind, Direction, ReadSymbol},
    };

    fn sample() -> Editor<Machine> {
        let mut editor = Editor::<Machine>::default();
        let tape = editor.request_add_tape().unwrap();
        let head = editor.request_add_head(tape, None).unwrap();
        editor.request_add_symbol("1").unwrap();
        let a = editor.request_add_state(0.0, 0.0, Some("q0")).unwrap();
        let b = editor.request_add_state(150.0, 0.0, Some("q1")).unwrap();
        let node_a = editor.diagram().node_for_state(a).unwrap();
        let node_b = editor.diagram().node_for_state(b).unwrap();
        editor.request_toggle_initial(node_a).unwrap();
        editor.request_toggle_accepting(node_b).unwrap();
        let t = editor.request_connect(node_a, node_b, None, None).unwrap();
        let edge = editor.diagram().edge_for_transition(t).unwrap();
        editor
            .request_add_read_symbol(edge, head, ReadSymbol::symbol("1"))
            .unwrap();
        editor
            .request_add_action(edge, head, ActionKind::Move(Direction::Right))
            .unwrap();
        editor
    }

    #[test]
    fn test_render_contains_every_element() {
        let editor = sample();
        let svg = SvgBuilder::new("unused.svg")
            .build()
            .unwrap()
            .render_to_string(editor.diagram());

        // Two nodes, plus the inner ring of the accepting one.
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("<path"));
        assert!(svg.contains("q0"));
        assert!(svg.contains("q1"));
        assert!(svg.contains("⇒"));
        assert!(svg.contains("rotate("));
    }

    #[test]
    fn test_background_from_style() {
        let style: StyleConfig = toml::from_str("background_color = \"white\"").unwrap();
        let exporter = SvgBuilder::new("unused.svg").with_style(&style).build().unwrap();
        let svg = exporter.render_to_string(&Diagram::default());
        assert!(svg.contains("<rect"));
    }

    #[test]
    fn test_invalid_background_is_a_render_error() {
        let style: StyleConfig = toml::from_str("background_color = \"nope\"").unwrap();
        let result = SvgBuilder::new("unused.svg").with_style(&style).build();
        assert!(matches!(result, Err(Error::Render(_))));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        let editor = sample();

        let mut exporter = SvgBuilder::new(&path.to_string_lossy()).build().unwrap();
        exporter.export_diagram(editor.diagram()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<svg"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.svg");
        let mut exporter = SvgBuilder::new(&path.to_string_lossy()).build().unwrap();

        let result = exporter.export_diagram(&Diagram::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
