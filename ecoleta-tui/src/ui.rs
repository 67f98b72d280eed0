use ecoleta_core::form::{FetchStatus, SubmissionStatus};
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
        canvas::{Canvas, Map as WorldMap, MapResolution},
    },
};

use crate::app::{App, Focus, Screen};

const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Areas of the registration screen.
struct RegisterLayout {
    name: Rect,
    email: Rect,
    whatsapp: Rect,
    uf: Rect,
    city: Rect,
    items: Rect,
    submit: Rect,
    map: Rect,
}

/// Outer layout: title, main content, status line
fn frame_layout(area: Rect) -> Option<(Rect, Rect, Rect)> {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    match layout_chunks.as_ref() {
        [header, content, status] => Some((*header, *content, *status)),
        _ => None,
    }
}

fn register_layout(content: Rect) -> Option<RegisterLayout> {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(content);
    let [form_area, map] = columns.as_ref() else {
        return None;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // name
            Constraint::Length(3), // email
            Constraint::Length(3), // whatsapp
            Constraint::Length(3), // uf
            Constraint::Length(3), // city
            Constraint::Min(3),    // items
            Constraint::Length(3), // submit
        ])
        .split(*form_area);
    let [name, email, whatsapp, uf, city, items, submit] = rows.as_ref() else {
        return None;
    };

    Some(RegisterLayout {
        name: *name,
        email: *email,
        whatsapp: *whatsapp,
        uf: *uf,
        city: *city,
        items: *items,
        submit: *submit,
        map: *map,
    })
}

/// Inner area of the map widget for a terminal of the given size.
pub(crate) fn map_inner_area(area: Rect) -> Rect {
    frame_layout(area)
        .and_then(|(_, content, _)| register_layout(content))
        .map_or(Rect::default(), |layout| {
            Block::default().borders(Borders::ALL).inner(layout.map)
        })
}

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let Some((header_area, content_area, status_area)) = frame_layout(frame.area()) else {
        return;
    };

    let header = Paragraph::new("Ecoleta – cadastro de pontos de coleta")
        .block(Block::default().borders(Borders::ALL).title("Ecoleta"));
    frame.render_widget(header, header_area);

    match app.screen {
        Screen::Home => draw_home(frame, content_area),
        Screen::Register => {
            if let Some(layout) = register_layout(content_area) {
                draw_register(frame, app, &layout);
            }
        }
    }

    draw_status(frame, app, status_area);

    if let Some(notice) = app.notice() {
        draw_notice(frame, notice, content_area);
    }
}

fn draw_home(frame: &mut Frame<'_>, area: Rect) {
    let text = vec![
        Line::from("Seu marketplace de coleta de resíduos.".bold()),
        Line::from(""),
        Line::from("Ajudamos pessoas a encontrarem pontos de coleta de forma eficiente."),
        Line::from(""),
        Line::from("Press Enter to register a collection point."),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Home"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_register(frame: &mut Frame<'_>, app: &App, layout: &RegisterLayout) {
    let contact = &app.form.contact;
    draw_text_field(frame, app, Focus::Name, "Nome da Entidade", &contact.name, layout.name);
    draw_text_field(frame, app, Focus::Email, "E-mail", &contact.email, layout.email);
    draw_text_field(frame, app, Focus::Whatsapp, "Whatsapp", &contact.whatsapp, layout.whatsapp);

    let uf_options = app.form.uf_options();
    let uf_label = uf_options
        .get(app.uf_index())
        .map_or("", |option| option.label.as_str());
    draw_dropdown(
        frame,
        app,
        Focus::Uf,
        "Estado (UF)",
        uf_label,
        &app.form.states.status,
        layout.uf,
    );

    let city_options = app.form.city_options();
    let city_label = city_options
        .get(app.city_index())
        .map_or("", |option| option.label.as_str());
    draw_dropdown(
        frame,
        app,
        Focus::City,
        "Cidade",
        city_label,
        &app.form.cities.status,
        layout.city,
    );

    draw_items(frame, app, layout.items);
    draw_submit(frame, app, layout.submit);
    draw_map(frame, app, layout.map);
}

fn field_block(app: &App, focus: Focus, title: &str) -> Block<'static> {
    let style = if app.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title.to_owned())
}

fn draw_text_field(
    frame: &mut Frame<'_>,
    app: &App,
    focus: Focus,
    title: &str,
    value: &str,
    area: Rect,
) {
    let text = if app.focus == focus {
        format!("{value}▏")
    } else {
        value.to_owned()
    };
    let paragraph = Paragraph::new(text).block(field_block(app, focus, title));
    frame.render_widget(paragraph, area);
}

fn draw_dropdown(
    frame: &mut Frame<'_>,
    app: &App,
    focus: Focus,
    title: &str,
    label: &str,
    status: &FetchStatus,
    area: Rect,
) {
    let mut spans = vec![Span::raw(format!("◂ {label} ▸"))];
    match status {
        FetchStatus::Loading => spans.push(" carregando…".yellow()),
        FetchStatus::Failed(reason) => spans.push(format!(" erro: {reason}").red()),
        FetchStatus::Idle | FetchStatus::Ready => {}
    }
    let paragraph = Paragraph::new(Line::from(spans)).block(field_block(app, focus, title));
    frame.render_widget(paragraph, area);
}

fn draw_items(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let entries = app.form.category_entries();
    let items = if entries.is_empty() {
        let message = match &app.form.categories.status {
            FetchStatus::Loading => "Carregando itens…".to_owned(),
            FetchStatus::Failed(reason) => format!("Erro ao carregar itens: {reason}"),
            FetchStatus::Idle | FetchStatus::Ready => "Nenhum item disponível.".to_owned(),
        };
        vec![ListItem::new(message)]
    } else {
        entries
            .iter()
            .map(|entry| {
                let mark = if entry.selected { "[x]" } else { "[ ]" };
                let style = if entry.selected {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{mark} {}", entry.item.title)).style(style)
            })
            .collect()
    };

    let list = List::new(items)
        .block(field_block(
            app,
            Focus::Items,
            "Itens de Coleta (selecione um ou mais)",
        ))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if app.focus == Focus::Items && !entries.is_empty() {
        state.select(Some(app.item_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_submit(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let label = match app.form.submission {
        SubmissionStatus::Sending => "Enviando…",
        SubmissionStatus::Idle | SubmissionStatus::Sent | SubmissionStatus::Failed(_) => {
            "Cadastrar ponto de coleta"
        }
    };
    let style = if app.focus == Focus::Submit {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, area);
}

fn draw_map(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let selected = app.form.selected_position;
    let block = field_block(app, Focus::Map, "Endereço – selecione o endereço no mapa")
        .title_bottom(Line::from(format!(
            " {:.5}, {:.5} ",
            selected.latitude, selected.longitude
        )))
        .title_bottom(Line::from(TILE_ATTRIBUTION).right_aligned());

    let inner = block.inner(area);
    let bounds = app.viewport().bounds(inner.width, inner.height);
    let cursor = app.cursor;
    let show_cursor = app.focus == Focus::Map;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(move |ctx| {
            ctx.draw(&WorldMap {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            if bounds.contains(selected) {
                ctx.print(selected.longitude, selected.latitude, "●".red().bold());
            }
            if show_cursor && bounds.contains(cursor) {
                ctx.print(cursor.longitude, cursor.latitude, "+".yellow());
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let nav_hint = match (app.screen, app.focus) {
        (Screen::Home, _) => "Enter/n register · q/Esc quit",
        (Screen::Register, Focus::Name | Focus::Email | Focus::Whatsapp) => {
            "Type to edit · Tab/Shift-Tab move · Ctrl-S submit · Esc home · Ctrl-C quit"
        }
        (Screen::Register, Focus::Map) => {
            "Click or ←↑↓→ + Enter to pick position · Tab move · Esc home · q quit"
        }
        (Screen::Register, Focus::Uf | Focus::City) => {
            "↑/↓ choose · Tab move · Ctrl-S submit · Esc home · q quit"
        }
        (Screen::Register, Focus::Items) => {
            "↑/↓ move · Space toggle · Tab move · Ctrl-S submit · Esc home · q quit"
        }
        (Screen::Register, Focus::Submit) => "Enter submit · Tab move · Esc home · q quit",
    };

    let (status_text, status_style) = match (&app.screen, &app.form.submission) {
        (Screen::Register, SubmissionStatus::Sending) => (
            format!("Sending… · {nav_hint}"),
            Style::default().fg(Color::Yellow),
        ),
        (Screen::Register, SubmissionStatus::Failed(reason)) => (
            format!("Registration failed: {reason} · {nav_hint}"),
            Style::default().fg(Color::Red),
        ),
        _ => (nav_hint.to_owned(), Style::default()),
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, area);
}

fn draw_notice(frame: &mut Frame<'_>, notice: &str, area: Rect) {
    let width = area.width.min(40);
    let height = area.height.min(5);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    let paragraph = Paragraph::new(vec![
        Line::from(notice.bold()),
        Line::from(""),
        Line::from("Enter to continue"),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}
