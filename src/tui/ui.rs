//! UI rendering for the visualizer.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Block, Borders, Paragraph},
    widgets::canvas::{Canvas, Context, Line as CanvasLine, Rectangle},
    style::{Color, Style, Modifier},
};
use crate::cpu::{ArrowView, Scene};
use crate::diagram::{Layout as DiagramLayout, Point};
use super::app::{Field, VisualizerApp};

/// Segments used to approximate each curved arrow.
const ARROW_SEGMENTS: usize = 24;

/// Arrowhead barb length, in diagram units.
const HEAD_LEN: f64 = 12.0;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &VisualizerApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(72),
            Constraint::Percentage(28),
        ])
        .split(frame.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    let scene = app.datapath.scene();
    draw_diagram(frame, left_chunks[0], &scene, &app.config.layout, app.arrow_progress());
    draw_status(frame, left_chunks[1], &scene);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(6),
        ])
        .split(chunks[1]);

    draw_inputs(frame, right_chunks[0], app);
    draw_help(frame, right_chunks[1]);
}

/// Draw boxes and arrows on a canvas in diagram coordinates.
fn draw_diagram(frame: &mut Frame, area: Rect, scene: &Scene, layout: &DiagramLayout, progress: f64) {
    let (width, height) = layout.size();

    let canvas = Canvas::default()
        .block(Block::default()
            .title(" Datapath ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for arrow in &scene.arrows {
                let drawn = if arrow.active { progress } else { 1.0 };
                draw_arrow(ctx, arrow, height, drawn);
            }
            ctx.layer();

            for view in &scene.boxes {
                let Ok(p) = layout.placement(view.component) else {
                    continue;
                };
                let color = if view.active { Color::Yellow } else { Color::Gray };
                ctx.draw(&Rectangle {
                    x: p.x,
                    y: height - (p.y + p.height),
                    width: p.width,
                    height: p.height,
                    color,
                });

                let style = if view.active {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let top = height - p.y;
                ctx.print(p.x + 8.0, top - p.height * 0.3, Span::styled(view.component.label(), style));
                if let Some(value) = &view.value {
                    ctx.print(
                        p.x + 8.0,
                        top - p.height * 0.75,
                        Span::styled(value.clone(), Style::default().fg(Color::LightRed)),
                    );
                }
            }
        });

    frame.render_widget(canvas, area);
}

/// Draw one arrow as a polyline with a two-barb head.
fn draw_arrow(ctx: &mut Context, arrow: &ArrowView, height: f64, drawn: f64) {
    let color = if arrow.active { Color::Magenta } else { Color::DarkGray };
    let flip = |p: Point| (p.x, height - p.y);

    let points = arrow.curve.sample(ARROW_SEGMENTS, drawn);
    for pair in points.windows(2) {
        let (x1, y1) = flip(pair[0]);
        let (x2, y2) = flip(pair[1]);
        ctx.draw(&CanvasLine { x1, y1, x2, y2, color });
    }

    if drawn < 1.0 {
        return;
    }

    let (tx, ty) = arrow.curve.tangent_at(1.0);
    let tip = arrow.curve.end;
    for angle in [0.45f64, -0.45] {
        let (sin, cos) = angle.sin_cos();
        let bx = -(tx * cos - ty * sin) * HEAD_LEN;
        let by = -(tx * sin + ty * cos) * HEAD_LEN;
        let (x1, y1) = flip(tip);
        let (x2, y2) = flip(Point::new(tip.x + bx, tip.y + by));
        ctx.draw(&CanvasLine { x1, y1, x2, y2, color });
    }
}

/// Draw the status bar.
fn draw_status(frame: &mut Frame, area: Rect, scene: &Scene) {
    let status = Paragraph::new(scene.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default()
            .title(" Status ")
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw the three input fields.
fn draw_inputs(frame: &mut Frame, area: Rect, app: &VisualizerApp) {
    let row = |field: Field, name: &'static str| {
        let focused = app.focus == field;
        let cursor = if focused { "▏" } else { "" };
        let style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![
            Span::raw(name),
            Span::styled(format!("{}{}", app.field_text(field), cursor), style),
        ])
    };

    let inputs = Paragraph::new(vec![
        row(Field::R1, "R1:    "),
        row(Field::R2, "R2:    "),
        row(Field::Instr, "Instr: "),
    ])
    .block(Block::default()
        .title(" Inputs ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green)));

    frame.render_widget(inputs, area);
}

/// Draw the help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("Enter: Run"),
        Line::from("Tab: Next input"),
        Line::from("Backspace: Edit"),
        Line::from("Del: Reset"),
        Line::from("Esc: Quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default()
        .title(" Help ")
        .borders(Borders::ALL));

    frame.render_widget(help, area);
}
