use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use relative_path::RelativePathBuf;
use scenewright_config::Config;
use scenewright_engine::{
    DocumentIndex, DocumentIndexer, SceneRecord, ScriptStatistics, StatisticsAggregator, io,
};
use std::{
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    sync::Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Files,
    Scenes,
}

struct App {
    project_path: PathBuf,
    files: Vec<RelativePathBuf>,
    file_list_state: ListState,
    scene_list_state: ListState,
    focus: Focus,
    indexer: DocumentIndexer,
    aggregator: StatisticsAggregator,
    index: Option<Arc<DocumentIndex>>,
    stats: Option<Arc<ScriptStatistics>>,
    error: Option<String>,
}

impl App {
    fn new(project_path: PathBuf) -> Result<Self> {
        let files = io::scan_scripts(&project_path)?
            .iter()
            .filter_map(|path| path.strip_prefix(&project_path).ok())
            .filter_map(|path| RelativePathBuf::from_path(path).ok())
            .collect();

        let mut app = Self {
            project_path,
            files,
            file_list_state: ListState::default(),
            scene_list_state: ListState::default(),
            focus: Focus::Files,
            indexer: DocumentIndexer,
            aggregator: StatisticsAggregator::new(),
            index: None,
            stats: None,
            error: None,
        };

        // Select first script if available
        if !app.files.is_empty() {
            app.file_list_state.select(Some(0));
            app.load_selected_script();
        }

        Ok(app)
    }

    fn scene_count(&self) -> usize {
        self.index.as_ref().map_or(0, |index| index.len())
    }

    fn selected_scene(&self) -> Option<&SceneRecord> {
        let index = self.index.as_ref()?;
        index.scenes.get(self.scene_list_state.selected()?)
    }

    fn move_selection(&mut self, forward: bool) {
        let (state, len) = match self.focus {
            Focus::Files => (&mut self.file_list_state, self.files.len()),
            Focus::Scenes => {
                let len = self.scene_count();
                (&mut self.scene_list_state, len)
            }
        };
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if forward => (i + 1) % len,
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        state.select(Some(i));

        if self.focus == Focus::Files {
            self.load_selected_script();
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Files if self.scene_count() > 0 => Focus::Scenes,
            _ => Focus::Files,
        };
    }

    fn load_selected_script(&mut self) {
        let Some(relative) = self
            .file_list_state
            .selected()
            .and_then(|i| self.files.get(i))
        else {
            return;
        };

        match io::read_script(relative, &self.project_path) {
            Ok(text) => {
                // Only reuses the previous index when the same text comes back.
                let index = self.indexer.index(&text, self.index.as_ref());
                self.stats = Some(self.aggregator.summarize(&index));
                self.scene_list_state
                    .select(if index.is_empty() { None } else { Some(0) });
                self.index = Some(index);
                self.error = None;
            }
            Err(e) => {
                log::warn!("failed to read {relative}: {e}");
                self.index = None;
                self.stats = None;
                self.scene_list_state.select(None);
                self.error = Some(format!("Error reading script: {e}"));
            }
        }
    }

    fn details(&self) -> Vec<Line<'static>> {
        if let Some(error) = &self.error {
            return vec![Line::from(error.clone())];
        }
        let Some(scene) = self.selected_scene() else {
            return self.summary();
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "{} {} {} {}",
                    scene.number(),
                    scene.time_of_day,
                    scene.location_kind,
                    scene.location
                ),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "Lines {}-{}{}",
                scene.line_index + 1,
                scene.end_line_index + 1,
                if scene.is_flashback { "  (flashback)" } else { "" }
            )),
            Line::from(format!(
                "{} words, about {} min",
                scene.word_count, scene.duration_minutes
            )),
            Line::from(""),
            Line::from(format!("Characters: {}", scene.characters.join(" "))),
        ];
        if !scene.tags.is_empty() {
            lines.push(Line::from(format!("Tags: {}", scene.tags.join(" "))));
        }
        if !scene.speakers.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from("Dialogue:"));
            lines.extend(scene.speakers.iter().map(|speaker| {
                Line::from(format!(
                    "  {}  {} lines, {} words",
                    speaker.name, speaker.lines, speaker.words
                ))
            }));
        }
        lines
    }

    fn summary(&self) -> Vec<Line<'static>> {
        let Some(stats) = &self.stats else {
            return vec![Line::from("Select a script to see its scenes")];
        };
        let totals = &stats.totals;
        vec![
            Line::from(format!(
                "{} scenes in {} episodes",
                totals.scenes, totals.episodes
            )),
            Line::from(format!(
                "{} words, about {} min",
                totals.words, totals.duration_minutes
            )),
        ]
    }
}

/// Resolves the project directory and runs the browser until `q`.
pub fn run(path: Option<PathBuf>) -> Result<()> {
    let config_path = Config::config_path();

    let (project_path, from_config) = match path {
        Some(path) => (path, false),
        None => match Config::load() {
            Ok(Some(config)) => (config.projects_path, true),
            Ok(None) => {
                eprintln!("Error: No project path provided and no config file found");
                eprintln!("Usage: scenewright browse <project-folder-path>");
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: scenewright browse <project-folder-path>");
                process::exit(1);
            }
        },
    };

    if let Err(e) = io::validate_project_dir(&project_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Project path '{}'{} is invalid: {e}",
            project_path.display(),
            source
        );
        process::exit(1);
    }

    let mut app = App::new(project_path)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.move_selection(true),
                KeyCode::Up | KeyCode::Char('k') => app.move_selection(false),
                KeyCode::Tab | KeyCode::Enter => app.toggle_focus(),
                KeyCode::Right | KeyCode::Char('l') if app.scene_count() > 0 => {
                    app.focus = Focus::Scenes;
                }
                KeyCode::Left | KeyCode::Char('h') => app.focus = Focus::Files,
                _ => {}
            }
        }
    }
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(40),
            Constraint::Percentage(35),
        ])
        .split(rows[0]);

    let highlight = Style::default().bg(Color::Yellow).fg(Color::Black);

    // Script list panel
    let file_items: Vec<ListItem> = app
        .files
        .iter()
        .map(|path| ListItem::new(Line::from(format!("📄 {path}"))))
        .collect();
    let files_list = List::new(file_items)
        .block(panel("Scripts", app.focus == Focus::Files))
        .highlight_style(highlight);
    f.render_stateful_widget(files_list, chunks[0], &mut app.file_list_state);

    // Scene list panel
    let scene_items: Vec<ListItem> = app
        .index
        .as_ref()
        .map(|index| {
            index
                .scenes
                .iter()
                .map(|scene| {
                    let marker = if scene.is_flashback { "↺ " } else { "  " };
                    ListItem::new(Line::from(format!(
                        "{marker}{} {} {} {}",
                        scene.number(),
                        scene.time_of_day,
                        scene.location_kind,
                        scene.location
                    )))
                })
                .collect()
        })
        .unwrap_or_default();
    let scenes_list = List::new(scene_items)
        .block(panel("Scenes", app.focus == Focus::Scenes))
        .highlight_style(highlight);
    f.render_stateful_widget(scenes_list, chunks[1], &mut app.scene_list_state);

    // Details panel
    let details = Paragraph::new(app.details())
        .block(panel("Details", false))
        .wrap(Wrap { trim: true });
    f.render_widget(details, chunks[2]);

    // Instructions
    let help = Paragraph::new(Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("↓/j: Next | "),
        Span::raw("Tab: Switch panel | ←/→: Scripts/Scenes"),
    ]));
    f.render_widget(help, rows[1]);
}
