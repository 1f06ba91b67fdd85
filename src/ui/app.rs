//! Application state machine and event loop
//!
//! One synchronous loop: draw, poll for a key, dispatch. Every command runs
//! to completion before the next is read, so the tree, cursor and expand
//! flags form a single owned unit mutated between discrete commands.

use std::io;
use std::time::Duration;

use ratatui::{
    DefaultTerminal, Frame,
    buffer::Buffer,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols,
    text::Line,
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::config::DcmTreeConfig;
use crate::model::DatasetEntry;
use crate::tree::{MIN_QUERY_LEN, SortMode, TagTree, TreeError, build_tree};
use crate::ui::help;
use crate::ui::search_bar::{SearchBar, SearchInput};
use crate::ui::tree_view::{TreeView, TreeViewState};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Mode {
    #[default]
    Browse,
    Search,
    Help,
}

/// The interactive browser.
pub struct App {
    root_label: String,
    entries: Vec<DatasetEntry>,
    tree: TagTree,
    sort: SortMode,
    mode: Mode,
    search: SearchInput,
    query: Option<String>,
    status: String,
    page_size: usize,
    view: TreeViewState,
    help_scroll: usize,
    value_display_limit: usize,
    exit: bool,
}

impl App {
    /// Build the initial tree and set up the browser state.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoRecords`] when `entries` is empty.
    pub fn new(
        root_label: String,
        entries: Vec<DatasetEntry>,
        sort: SortMode,
        config: &DcmTreeConfig,
    ) -> Result<Self, TreeError> {
        let tree = build_tree(&root_label, &entries, sort, config.value_display_limit)?;
        let mut app = Self {
            root_label,
            entries,
            tree,
            sort,
            mode: Mode::default(),
            search: SearchInput::new(),
            query: None,
            status: format!("sorted {sort}"),
            page_size: 0,
            view: TreeViewState::default(),
            help_scroll: 0,
            value_display_limit: config.value_display_limit,
            exit: false,
        };
        app.open_initial();
        Ok(app)
    }

    /// Run the draw/handle loop until quit.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` when terminal drawing or event polling fails.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [list_area, _, _] = Self::layouted_areas(frame.area());
        self.page_size = list_area.height.saturating_sub(2) as usize;
        frame.render_widget(self, frame.area());
    }

    fn layouted_areas(area: Rect) -> [Rect; 3] {
        Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .areas(area)
    }

    fn handle_events(&mut self) -> io::Result<()> {
        // Bounded poll so a resize repaints promptly.
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key_event) = event::read()?
            && key_event.kind == KeyEventKind::Press
        {
            self.handle_key_event(key_event);
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key_event),
            Mode::Search => self.handle_search_key(key_event),
            Mode::Help => self.handle_help_key(key_event),
        }
    }

    fn handle_browse_key(&mut self, key_event: KeyEvent) {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key_event.modifiers.contains(KeyModifiers::SHIFT);
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
            KeyCode::Char('?') => {
                self.mode = Mode::Help;
                self.help_scroll = 0;
            }
            KeyCode::Char('/') => self.mode = Mode::Search,

            KeyCode::Char('1') => self.set_sort(SortMode::ByFile),
            KeyCode::Char('2') => self.set_sort(SortMode::ByTag),
            KeyCode::Char('3') => self.set_sort(SortMode::ByTagDiffOnly),

            KeyCode::Up if shift => self.same_level_up(),
            KeyCode::Char('K') => self.same_level_up(),
            KeyCode::Down if shift => self.same_level_down(),
            KeyCode::Char('J') => self.same_level_down(),

            KeyCode::Char('p') if ctrl => self.move_rows_up(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_rows_up(1),
            KeyCode::Char('n') if ctrl => self.move_rows_down(1),
            KeyCode::Down | KeyCode::Char('j') => self.move_rows_down(1),

            KeyCode::Char('u') if ctrl => self.move_rows_up(self.page_size / 2),
            KeyCode::Char('d') if ctrl => self.move_rows_down(self.page_size / 2),
            KeyCode::Char('b') if ctrl => self.move_rows_up(self.page_size),
            KeyCode::PageUp => self.move_rows_up(self.page_size),
            KeyCode::Char('f') if ctrl => self.move_rows_down(self.page_size),
            KeyCode::PageDown => self.move_rows_down(self.page_size),

            KeyCode::Left if shift => {
                self.tree.move_to_parent();
                self.status = "moved to parent".to_owned();
            }
            KeyCode::Char('H') => {
                self.tree.move_to_parent();
                self.status = "moved to parent".to_owned();
            }
            KeyCode::Right if shift => {
                self.tree.move_to_first_child();
                self.status = "moved to first child".to_owned();
            }
            KeyCode::Char('L') => {
                self.tree.move_to_first_child();
                self.status = "moved to first child".to_owned();
            }

            KeyCode::Right | KeyCode::Char('l') => {
                self.tree.expand_or_move_to_first_child();
                self.status = "expand / first child".to_owned();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.tree.collapse_or_move_to_parent();
                self.status = "collapse / parent".to_owned();
            }

            KeyCode::Char('g') => {
                self.tree.jump_to_root();
                self.status = "jumped to root".to_owned();
            }
            KeyCode::Char('G') => {
                self.tree.jump_to_last_visible();
                self.status = "jumped to last visible node".to_owned();
            }

            KeyCode::Char('0' | '^') => {
                self.tree.move_to_first_sibling();
                self.tree.reveal_cursor();
                self.status = "moved to first sibling".to_owned();
            }
            KeyCode::Char('$') => {
                self.tree.move_to_last_sibling();
                self.tree.reveal_cursor();
                self.status = "moved to last sibling".to_owned();
            }

            KeyCode::Char('e') => {
                self.tree.expand_siblings();
                self.status = "expanded current node and siblings".to_owned();
            }
            KeyCode::Char('c') => {
                self.tree.collapse_siblings();
                self.status = "collapsed current node and siblings".to_owned();
            }
            KeyCode::Char('E') => {
                self.tree.expand_cursor_recursive();
                self.status = "expanded subtree".to_owned();
            }
            KeyCode::Char('C') => {
                self.tree.collapse_cursor_recursive();
                self.status = "collapsed subtree".to_owned();
            }

            KeyCode::Enter | KeyCode::Char(' ') => {
                self.tree.toggle_cursor();
                self.status = "toggled node".to_owned();
            }

            KeyCode::Char('n') => self.search_step(1),
            KeyCode::Char('N') => self.search_step(-1),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.search.clear();
                self.query = None;
                self.mode = Mode::Browse;
                self.status = "search cancelled".to_owned();
            }
            KeyCode::Enter => {
                self.query = (!self.search.is_empty()).then(|| self.search.text().to_owned());
                self.mode = Mode::Browse;
            }
            KeyCode::Backspace => {
                self.search.backspace();
                self.incremental_search();
            }
            KeyCode::Delete => {
                self.search.delete();
                self.incremental_search();
            }
            KeyCode::Left => self.search.cursor_left(),
            KeyCode::Right => self.search.cursor_right(),
            KeyCode::Home => self.search.cursor_home(),
            KeyCode::End => self.search.cursor_end(),
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert_char(c);
                self.incremental_search();
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('?' | 'q') | KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Up | KeyCode::Char('k') => {
                self.help_scroll = self.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max_scroll = help::line_count().saturating_sub(3);
                if self.help_scroll < max_scroll {
                    self.help_scroll += 1;
                }
            }
            _ => {}
        }
    }

    fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        match build_tree(&self.root_label, &self.entries, sort, self.value_display_limit) {
            Ok(tree) => {
                self.tree = tree;
                self.view = TreeViewState::default();
                self.open_initial();
                self.status = format!("sorted {sort}");
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Open the root and its first level so a fresh tree shows more than a
    /// single collapsed line.
    fn open_initial(&mut self) {
        let root = self.tree.root();
        self.tree.set_expanded(root, true);
        for child in self.tree.node(root).children.clone() {
            self.tree.set_expanded(child, true);
        }
    }

    fn move_rows_down(&mut self, n: usize) {
        self.tree.select_next(n.max(1));
        self.status = "down".to_owned();
    }

    fn move_rows_up(&mut self, n: usize) {
        self.tree.select_prev(n.max(1));
        self.status = "up".to_owned();
    }

    fn same_level_down(&mut self) {
        self.tree.move_down_same_level();
        // The jump may land inside a collapsed subtree; open the way there.
        self.tree.reveal_cursor();
        self.status = "moved to next node on this level".to_owned();
    }

    fn same_level_up(&mut self) {
        self.tree.move_up_same_level();
        self.tree.reveal_cursor();
        self.status = "moved to previous node on this level".to_owned();
    }

    /// Re-anchor the live query while it is being typed.
    fn incremental_search(&mut self) {
        let query = self.search.text().to_owned();
        if query.chars().count() < MIN_QUERY_LEN {
            self.status = "type at least 2 characters to search".to_owned();
            return;
        }
        self.tree.jump_to_nth_match(&query, 0);
        let (matches, _) = self.tree.find_matches(&query);
        self.status = if matches.is_empty() {
            format!("no matches for '{query}'")
        } else {
            format!("{} match(es) for '{query}'", matches.len())
        };
    }

    /// Cycle to the next (`+1`) or previous (`-1`) match of the accepted
    /// query.
    fn search_step(&mut self, offset: isize) {
        let Some(query) = self.query.clone() else {
            self.status = "nothing to search for".to_owned();
            return;
        };
        if self.tree.jump_to_nth_match(&query, offset) {
            let (matches, anchor) = self.tree.find_matches(&query);
            self.status = format!("match {}/{} for '{query}'", anchor + 1, matches.len());
        } else {
            self.status = format!("no further match for '{query}'");
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [list_area, state_area, input_area] = App::layouted_areas(area);

        let bottom_vert_border_set = symbols::border::Set {
            bottom_left: symbols::line::NORMAL.vertical_right,
            bottom_right: symbols::line::NORMAL.vertical_left,
            ..symbols::border::PLAIN
        };

        let title = Line::from(vec![
            " dcmtree - ".bold(),
            self.root_label.as_str().into(),
            format!(" ({}) ", self.sort).into(),
        ]);
        let tree_block = Block::bordered()
            .title(title.centered())
            .border_set(bottom_vert_border_set);
        let tree_view = TreeView::new(&self.tree)
            .block(tree_block)
            .highlight_style(Style::new().bg(Color::DarkGray));
        StatefulWidget::render(tree_view, list_area, buf, &mut self.view);

        let state_block = Block::bordered()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
            .border_set(bottom_vert_border_set);
        let status_line = Line::from(vec![self.status.as_str().yellow()]);
        Paragraph::new(status_line)
            .centered()
            .block(state_block)
            .render(state_area, buf);

        let input_block = Block::bordered().borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM);
        SearchBar::new(&self.search, self.mode == Mode::Search)
            .block(input_block)
            .render(input_area, buf);

        if self.mode == Mode::Help {
            help::render_overlay(area, buf, self.help_scroll);
        }
    }
}
