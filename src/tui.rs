use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Terminal,
};
use std::time::{Duration, Instant};
use anyhow::Result;
use crate::board::tile_label;
use crate::session::Session;
use crate::solver::WordPath;
use std::sync::Arc;
use tracing::debug;

const LIST_PAGE: usize = 20;
const FRAME: Duration = Duration::from_millis(16);

pub struct AppState {
    input: String,
    filtered_words: Vec<WordPath>,
    selected_idx: usize,
    focus: Focus,
    session: Arc<Session>,
    list_scroll: usize,
    visible_list_range: (usize, usize),
}

enum Focus {
    WordList,
    Board,
}

pub async fn run_tui(session: Session) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState {
        input: String::new(),
        filtered_words: Vec::new(),
        selected_idx: 0,
        focus: Focus::WordList,
        session: Arc::new(session),
        list_scroll: 0,
        visible_list_range: (0, 0),
    };
    filter_words(&mut app);

    loop {
        let now = Instant::now();

        terminal.draw(|f| render_ui(f, &mut app))?;

        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('q') if matches!(app.focus, Focus::Board) => break,
                    KeyCode::Tab => toggle_focus(&mut app),
                    _ => handle_key(&mut app, key.code),
                }
            }
        }

        let elapsed = now.elapsed();
        if elapsed < FRAME {
            tokio::time::sleep(FRAME - elapsed).await;
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn toggle_focus(app: &mut AppState) {
    app.focus = match app.focus {
        Focus::WordList => Focus::Board,
        Focus::Board => Focus::WordList,
    };
}

fn handle_key(app: &mut AppState, key: KeyCode) {
    match app.focus {
        Focus::WordList => handle_word_list_keys(app, key),
        Focus::Board => move_selection(app, key),
    }
}

fn handle_word_list_keys(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            app.input.push(c.to_ascii_uppercase());
            filter_words(app);
        }
        KeyCode::Backspace => {
            app.input.pop();
            filter_words(app);
        }
        _ => move_selection(app, key),
    }
}

fn move_selection(app: &mut AppState, key: KeyCode) {
    let words_len = app.filtered_words.len();
    if words_len == 0 {
        return;
    }

    app.selected_idx = match key {
        KeyCode::Up => app.selected_idx.saturating_sub(1),
        KeyCode::Down => (app.selected_idx + 1).min(words_len - 1),
        KeyCode::PageUp => app.selected_idx.saturating_sub(LIST_PAGE),
        KeyCode::PageDown => (app.selected_idx + LIST_PAGE).min(words_len - 1),
        KeyCode::Home => 0,
        KeyCode::End => words_len - 1,
        _ => return,
    };
    update_list_scroll(app);
}

fn update_list_scroll(app: &mut AppState) {
    let visible_height = app.visible_list_range.1 - app.visible_list_range.0;

    if app.selected_idx < app.list_scroll {
        app.list_scroll = app.selected_idx;
    } else if visible_height > 0 && app.selected_idx >= app.list_scroll + visible_height {
        app.list_scroll = app.selected_idx - visible_height + 1;
    }
}

fn filter_words(app: &mut AppState) {
    app.filtered_words = app
        .session
        .found_starting_with(&app.input)
        .into_iter()
        .cloned()
        .collect();
    app.selected_idx = 0;
    app.list_scroll = 0;
    debug!(prefix = %app.input, matches = app.filtered_words.len(), "filtered words");
}

fn selected_word(app: &AppState) -> Option<&WordPath> {
    app.filtered_words.get(app.selected_idx)
}

fn render_ui<B: tui::backend::Backend>(f: &mut tui::Frame<B>, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(10),
            ]
                .as_ref(),
        )
        .split(f.size());

    render_status_bar(f, app, chunks[0]);
    render_input(f, app, chunks[1]);
    render_main_content(f, app, chunks[2]);
}

fn render_status_bar<B: tui::backend::Backend>(f: &mut tui::Frame<B>, app: &AppState, area: Rect) {
    let keys = match app.focus {
        Focus::WordList => "WORDS [Type:Filter Tab:Board Esc:Quit]",
        Focus::Board => "BOARD [Up/Down:Select Tab:Words q:Quit]",
    };
    let status = format!(
        "{} | {} words, score {} | dictionary {}",
        keys,
        app.session.found().len(),
        app.session.total_score(),
        app.session.dictionary_size(),
    );

    let status_bar = Paragraph::new(status)
        .block(Block::default())
        .style(Style::default().bg(Color::DarkGray));

    f.render_widget(status_bar, area);
}

fn render_input<B: tui::backend::Backend>(f: &mut tui::Frame<B>, app: &AppState, area: Rect) {
    let input_text = format!("> {}", app.input);

    let input = Paragraph::new(input_text.as_str())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Yellow));

    f.render_widget(input, area);
}

fn render_main_content<B: tui::backend::Backend>(f: &mut tui::Frame<B>, app: &mut AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(area);

    render_word_list(f, app, chunks[0]);
    render_board(f, app, chunks[1]);
}

fn render_word_list<B: tui::backend::Backend>(f: &mut tui::Frame<B>, app: &mut AppState, area: Rect) {
    // borders take two rows
    let height = (area.height as usize).saturating_sub(2);
    app.visible_list_range = (app.list_scroll, app.list_scroll + height);

    let end = std::cmp::min(app.list_scroll + height, app.filtered_words.len());
    let visible_words = &app.filtered_words[app.list_scroll.min(end)..end];

    let items: Vec<ListItem> = visible_words
        .iter()
        .map(|found| ListItem::new(format!("{:<16} {:>2}", found.word, found.score())))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Words"))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if !app.filtered_words.is_empty() {
        state.select(Some(app.selected_idx - app.list_scroll));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn render_board<B: tui::backend::Backend>(f: &mut tui::Frame<B>, app: &AppState, area: Rect) {
    let Some(board) = app.session.board() else {
        return;
    };
    let path = selected_word(app).map(|found| found.cells.as_slice()).unwrap_or(&[]);

    let mut lines: Vec<Spans> = Vec::with_capacity(board.rows() * 2);
    for r in 0..board.rows() {
        let spans: Vec<Span> = (0..board.cols())
            .map(|c| {
                let label = format!(" {:<3}", tile_label(board.letter_at(r, c)));
                match path.iter().position(|&cell| cell == (r, c)) {
                    Some(0) => Span::styled(
                        label,
                        Style::default()
                            .bg(Color::Red)
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Some(_) => Span::styled(label, Style::default().bg(Color::Yellow).fg(Color::Black)),
                    None => Span::raw(label),
                }
            })
            .collect();
        lines.push(Spans::from(spans));
        lines.push(Spans::from(Span::raw("")));
    }

    let title = selected_word(app)
        .map(|found| format!("Board - {} ({} pts)", found.word, found.score()))
        .unwrap_or_else(|| "Board".to_string());

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(paragraph, area);
}
