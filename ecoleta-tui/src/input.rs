use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ecoleta_core::{
    form::{Effect, FormEvent},
    model::ContactField,
};

use crate::app::{App, Focus, Screen};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run the effects returned by the form for the current session
    Run(Vec<Effect>),
}

impl Action {
    fn from_effects(effects: Vec<Effect>) -> Self {
        if effects.is_empty() {
            Action::None
        } else {
            Action::Run(effects)
        }
    }
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    // Global quit shortcut
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match app.screen {
        Screen::Home => match key.code {
            Char('q') | Esc => Action::Quit,
            Enter | Char('n') => Action::from_effects(app.open_register()),
            _ => Action::None,
        },

        Screen::Register => {
            // The confirmation notice blocks everything until acknowledged.
            if app.notice().is_some() {
                if matches!(key.code, Enter | Esc | Char(' ')) {
                    app.go_home();
                }
                return Action::None;
            }

            if key.code == Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return submit(app);
            }

            match key.code {
                Esc => {
                    app.go_home();
                    return Action::None;
                }
                Tab => {
                    app.focus = app.focus.next();
                    return Action::None;
                }
                BackTab => {
                    app.focus = app.focus.previous();
                    return Action::None;
                }
                Char('q') if !app.focus.is_text() => return Action::Quit,
                _ => {}
            }

            match app.focus {
                Focus::Name => edit_field(key, app, ContactField::Name),
                Focus::Email => edit_field(key, app, ContactField::Email),
                Focus::Whatsapp => edit_field(key, app, ContactField::Whatsapp),
                Focus::Map => match key.code {
                    Up | Char('k') => move_cursor(app, 1, 0),
                    Down | Char('j') => move_cursor(app, -1, 0),
                    Left | Char('h') => move_cursor(app, 0, -1),
                    Right | Char('l') => move_cursor(app, 0, 1),
                    Enter | Char(' ') => {
                        let position = app.cursor;
                        apply(app, FormEvent::MapClicked(position))
                    }
                    _ => Action::None,
                },
                Focus::Uf => match key.code {
                    Up | Char('k') => {
                        let event = app.step_uf(-1);
                        step(app, event)
                    }
                    Down | Char('j') => {
                        let event = app.step_uf(1);
                        step(app, event)
                    }
                    _ => Action::None,
                },
                Focus::City => match key.code {
                    Up | Char('k') => {
                        let event = app.step_city(-1);
                        step(app, event)
                    }
                    Down | Char('j') => {
                        let event = app.step_city(1);
                        step(app, event)
                    }
                    _ => Action::None,
                },
                Focus::Items => match key.code {
                    Up | Left | Char('k') => {
                        app.item_index = app.item_index.saturating_sub(1);
                        Action::None
                    }
                    Down | Right | Char('j') => {
                        if app.item_index + 1 < app.form.categories.data.len() {
                            app.item_index += 1;
                        }
                        Action::None
                    }
                    Enter | Char(' ') => {
                        let Some(item) = app.form.categories.data.get(app.item_index) else {
                            return Action::None;
                        };
                        let id = item.id;
                        apply(app, FormEvent::CategoryToggled(id))
                    }
                    _ => Action::None,
                },
                Focus::Submit => match key.code {
                    Enter | Char(' ') => submit(app),
                    _ => Action::None,
                },
            }
        }
    }
}

pub(crate) fn handle_mouse_event(mouse: MouseEvent, app: &mut App) -> Action {
    if app.screen != Screen::Register || app.notice().is_some() {
        return Action::None;
    }
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return Action::None;
    }
    let Some(position) = app.map_coordinate_at(mouse.column, mouse.row) else {
        return Action::None;
    };
    app.focus = Focus::Map;
    app.cursor = position;
    apply(app, FormEvent::MapClicked(position))
}

fn edit_field(key: KeyEvent, app: &mut App, field: ContactField) -> Action {
    let mut value = app.form.contact.get(field).to_owned();
    match key.code {
        KeyCode::Char(character) => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return Action::None;
            }
            value.push(character);
        }
        KeyCode::Backspace => {
            if value.pop().is_none() {
                return Action::None;
            }
        }
        KeyCode::Enter | KeyCode::Down => {
            app.focus = app.focus.next();
            return Action::None;
        }
        KeyCode::Up => {
            app.focus = app.focus.previous();
            return Action::None;
        }
        _ => return Action::None,
    }
    apply(app, FormEvent::FieldEdited { field, value })
}

fn move_cursor(app: &mut App, rows: i32, columns: i32) -> Action {
    app.move_cursor(rows, columns);
    Action::None
}

fn step(app: &mut App, event: Option<FormEvent>) -> Action {
    match event {
        Some(event) => apply(app, event),
        None => Action::None,
    }
}

fn submit(app: &mut App) -> Action {
    apply(app, FormEvent::Submitted)
}

fn apply(app: &mut App, event: FormEvent) -> Action {
    Action::from_effects(app.handle(event))
}
