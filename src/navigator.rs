//! The selection state machine.
//!
//! A [`Navigator`] walks the operator through profile, region and instance
//! selection. It is owned by the event loop and mutated one [`Message`] at a
//! time; anything slow is requested by returning [`Command`]s, whose results
//! come back later as further messages.

use tracing::{debug, error, info};

use crate::{
    dispatch::Command,
    error::SelectorError,
    filter::{extract_id, filter_items},
    inventory::Tag,
};

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    ProfileSelect,
    RegionSelect,
    InstanceSelect,
    Done,
}

impl Stage {
    /// What the stage lists, as used in messages.
    pub fn noun(self) -> &'static str {
        match self {
            Stage::ProfileSelect => "AWS profiles",
            Stage::RegionSelect => "regions",
            Stage::InstanceSelect => "instances",
            Stage::Done => "selections",
        }
    }
}

/// Keyboard input after terminal-specific decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Backspace,
    Esc,
    ForceQuit,
    Char(char),
}

#[derive(Debug)]
pub enum Message {
    Key(Key),
    RegionsLoaded(Result<Vec<String>, SelectorError>),
    InstancesLoaded(Result<Vec<String>, SelectorError>),
    TagsLoaded {
        instance_id: String,
        result: Result<Vec<Tag>, SelectorError>,
    },
    Tick,
}

/// Side panel contents for the highlighted instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreviewState {
    /// Instance whose tags are wanted; `None` when nothing is highlighted.
    pub target_id: Option<String>,
    pub tags: Vec<Tag>,
    pub loading: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub instance: Option<String>,
}

/// How a finished run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Confirmed {
        profile: String,
        region: String,
        instance: String,
    },
    Aborted,
    Failed(SelectorError),
}

#[derive(Debug)]
pub struct Navigator {
    stage: Stage,
    items: Vec<String>,
    filtered: Vec<String>,
    query: String,
    cursor: usize,
    selection: Selection,
    loading: bool,
    tick_pending: bool,
    spinner_frame: usize,
    preview: PreviewState,
    error: Option<SelectorError>,
    finished: bool,
}

impl Navigator {
    /// Starts on the profile stage, or in the failed state if no profile is
    /// available.
    pub fn new(profiles: anyhow::Result<Vec<String>>) -> Self {
        let mut navigator = Self {
            stage: Stage::ProfileSelect,
            items: Vec::new(),
            filtered: Vec::new(),
            query: String::new(),
            cursor: 0,
            selection: Selection::default(),
            loading: false,
            tick_pending: false,
            spinner_frame: 0,
            preview: PreviewState::default(),
            error: None,
            finished: false,
        };
        match profiles {
            Ok(profiles) if profiles.is_empty() => {
                navigator.fail(SelectorError::Configuration("no profiles found".into()));
            }
            Ok(profiles) => {
                info!(count = profiles.len(), "profiles loaded");
                navigator.install(profiles);
            }
            Err(err) => {
                navigator.fail(SelectorError::Configuration(format!("{err:#}")));
            }
        }
        navigator
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn filtered(&self) -> &[String] {
        &self.filtered
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn preview(&self) -> &PreviewState {
        &self.preview
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    pub fn error(&self) -> Option<&SelectorError> {
        self.error.as_ref()
    }

    /// `Some` once the run is over; the event loop stops at that point.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.finished {
            return None;
        }
        if let Some(err) = &self.error {
            return Some(Outcome::Failed(err.clone()));
        }
        match (&self.stage, &self.selection) {
            (
                Stage::Done,
                Selection {
                    profile: Some(profile),
                    region: Some(region),
                    instance: Some(instance),
                },
            ) => Some(Outcome::Confirmed {
                profile: profile.clone(),
                region: region.clone(),
                instance: instance.clone(),
            }),
            _ => Some(Outcome::Aborted),
        }
    }

    pub fn update(&mut self, message: Message) -> Vec<Command> {
        if self.finished {
            return Vec::new();
        }
        match message {
            Message::Key(key) => self.handle_key(key),
            Message::RegionsLoaded(result) => self.handle_list_loaded(Stage::ProfileSelect, result),
            Message::InstancesLoaded(result) => {
                self.handle_list_loaded(Stage::RegionSelect, result)
            }
            Message::TagsLoaded {
                instance_id,
                result,
            } => {
                self.handle_tags_loaded(instance_id, result);
                Vec::new()
            }
            Message::Tick => self.handle_tick(),
        }
    }

    fn handle_key(&mut self, key: Key) -> Vec<Command> {
        if matches!(key, Key::Esc | Key::ForceQuit) {
            info!(stage = ?self.stage, "selection aborted");
            self.finished = true;
            self.loading = false;
            return Vec::new();
        }
        if self.loading {
            return Vec::new();
        }
        match key {
            Key::Up => self.move_cursor(-1),
            Key::Down => self.move_cursor(1),
            Key::Char('k') if self.query.is_empty() => self.move_cursor(-1),
            Key::Char('j') if self.query.is_empty() => self.move_cursor(1),
            Key::Enter => return self.confirm(),
            Key::Backspace => {
                self.query.pop();
            }
            Key::Char(ch) if is_filter_char(ch) => self.query.push(ch),
            _ => {}
        }
        self.refilter();
        self.sync_preview().into_iter().collect()
    }

    fn move_cursor(&mut self, delta: isize) {
        let last = self.filtered.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    fn refilter(&mut self) {
        self.filtered = filter_items(&self.items, &self.query);
        if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len().saturating_sub(1);
        }
    }

    fn confirm(&mut self) -> Vec<Command> {
        let Some(entry) = self.filtered.get(self.cursor).cloned() else {
            return self.fail(SelectorError::EmptySelection { stage: self.stage });
        };
        match self.stage {
            Stage::ProfileSelect => {
                info!(profile = %entry, "profile selected");
                self.selection.profile = Some(entry.clone());
                self.begin_loading(Command::LoadRegions { profile: entry })
            }
            Stage::RegionSelect => {
                info!(region = %entry, "region selected");
                self.selection.region = Some(entry.clone());
                self.begin_loading(Command::LoadInstances {
                    profile: self.profile().to_string(),
                    region: entry,
                })
            }
            Stage::InstanceSelect => {
                let instance = extract_id(&entry).to_string();
                info!(%instance, "instance selected");
                self.selection.instance = Some(instance);
                self.stage = Stage::Done;
                self.finished = true;
                Vec::new()
            }
            Stage::Done => Vec::new(),
        }
    }

    fn begin_loading(&mut self, fetch: Command) -> Vec<Command> {
        self.loading = true;
        let mut commands = vec![fetch];
        if !self.tick_pending {
            self.tick_pending = true;
            commands.push(Command::ScheduleTick);
        }
        commands
    }

    fn handle_list_loaded(
        &mut self,
        expected: Stage,
        result: Result<Vec<String>, SelectorError>,
    ) -> Vec<Command> {
        if !self.loading || self.stage != expected {
            debug!(stage = ?self.stage, "ignoring list result for another stage");
            return Vec::new();
        }
        self.loading = false;
        let items = match result {
            Ok(items) => items,
            Err(err) => return self.fail(err),
        };
        self.stage = match expected {
            Stage::ProfileSelect => Stage::RegionSelect,
            _ => Stage::InstanceSelect,
        };
        info!(stage = ?self.stage, count = items.len(), "stage ready");
        self.install(items);
        self.sync_preview().into_iter().collect()
    }

    fn install(&mut self, items: Vec<String>) {
        self.filtered = items.clone();
        self.items = items;
        self.query.clear();
        self.cursor = 0;
    }

    /// Requests tags whenever the highlighted instance differs from the one
    /// the preview was last asked for.
    fn sync_preview(&mut self) -> Option<Command> {
        if self.stage != Stage::InstanceSelect {
            return None;
        }
        let Some(entry) = self.filtered.get(self.cursor) else {
            self.preview = PreviewState::default();
            return None;
        };
        let instance_id = extract_id(entry).to_string();
        if self.preview.target_id.as_deref() == Some(instance_id.as_str()) {
            return None;
        }
        self.preview = PreviewState {
            target_id: Some(instance_id.clone()),
            tags: Vec::new(),
            loading: true,
        };
        Some(Command::LoadTags {
            profile: self.profile().to_string(),
            region: self.selection.region.clone().unwrap_or_default(),
            instance_id,
        })
    }

    fn handle_tags_loaded(&mut self, instance_id: String, result: Result<Vec<Tag>, SelectorError>) {
        if self.preview.target_id.as_deref() != Some(instance_id.as_str()) {
            debug!(%instance_id, "dropping stale tag result");
            return;
        }
        self.preview.loading = false;
        self.preview.tags = match result {
            Ok(tags) => tags,
            Err(err) => {
                debug!(%instance_id, "tag preview unavailable: {err}");
                Vec::new()
            }
        };
    }

    fn handle_tick(&mut self) -> Vec<Command> {
        self.tick_pending = false;
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        if self.loading {
            self.tick_pending = true;
            vec![Command::ScheduleTick]
        } else {
            Vec::new()
        }
    }

    fn fail(&mut self, err: SelectorError) -> Vec<Command> {
        error!(stage = ?self.stage, "{err}");
        self.error = Some(err);
        self.loading = false;
        self.finished = true;
        Vec::new()
    }

    fn profile(&self) -> &str {
        self.selection.profile.as_deref().unwrap_or_default()
    }
}

/// Printable ASCII only; wider characters never reach the query.
fn is_filter_char(ch: char) -> bool {
    matches!(ch, ' '..='~')
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::LookupKind;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn navigator(profiles: &[&str]) -> Navigator {
        Navigator::new(Ok(strings(profiles)))
    }

    fn press(nav: &mut Navigator, key: Key) -> Vec<Command> {
        nav.update(Message::Key(key))
    }

    fn type_text(nav: &mut Navigator, text: &str) -> Vec<Command> {
        text.chars()
            .flat_map(|ch| press(nav, Key::Char(ch)))
            .collect()
    }

    fn tag(key: &str, value: &str) -> Tag {
        Tag {
            key: key.into(),
            value: value.into(),
        }
    }

    fn tags_loaded(id: &str, tags: Vec<Tag>) -> Message {
        Message::TagsLoaded {
            instance_id: id.into(),
            result: Ok(tags),
        }
    }

    fn load_tags(id: &str) -> Command {
        Command::LoadTags {
            profile: "prod".into(),
            region: "us-west-2".into(),
            instance_id: id.into(),
        }
    }

    /// A navigator sitting on the instance stage with the given hosts.
    fn on_instances(hosts: &[&str]) -> (Navigator, Vec<Command>) {
        let mut nav = navigator(&["default", "prod"]);
        press(&mut nav, Key::Down);
        press(&mut nav, Key::Enter);
        nav.update(Message::RegionsLoaded(Ok(strings(&["us-east-1", "us-west-2"]))));
        press(&mut nav, Key::Down);
        press(&mut nav, Key::Enter);
        let commands = nav.update(Message::InstancesLoaded(Ok(strings(hosts))));
        (nav, commands)
    }

    #[test]
    fn starts_on_profiles() {
        let nav = navigator(&["default", "prod"]);
        assert_eq!(nav.stage(), Stage::ProfileSelect);
        assert_eq!(nav.filtered(), ["default", "prod"]);
        assert_eq!(nav.cursor(), 0);
        assert!(nav.outcome().is_none());
    }

    #[test]
    fn missing_profiles_fail_immediately() {
        let nav = Navigator::new(Err(anyhow::anyhow!("reading credentials")));
        assert_eq!(
            nav.outcome(),
            Some(Outcome::Failed(SelectorError::Configuration(
                "reading credentials".into()
            )))
        );

        let nav = navigator(&[]);
        assert!(matches!(
            nav.error(),
            Some(SelectorError::Configuration(_))
        ));
    }

    #[test]
    fn cursor_stays_within_bounds_without_wrapping() {
        let mut nav = navigator(&["a", "b", "c"]);
        press(&mut nav, Key::Up);
        assert_eq!(nav.cursor(), 0);
        press(&mut nav, Key::Down);
        press(&mut nav, Key::Down);
        press(&mut nav, Key::Down);
        assert_eq!(nav.cursor(), 2);
        press(&mut nav, Key::Char('k'));
        assert_eq!(nav.cursor(), 1);
        press(&mut nav, Key::Char('j'));
        assert_eq!(nav.cursor(), 2);
    }

    #[test]
    fn letter_navigation_only_with_empty_query() {
        let mut nav = navigator(&["jump", "kick", "jack"]);
        type_text(&mut nav, "j");
        assert_eq!(nav.query(), "");
        assert_eq!(nav.cursor(), 1);

        type_text(&mut nav, "a");
        assert_eq!(nav.query(), "a");
        assert_eq!(nav.filtered(), ["jack"]);
        type_text(&mut nav, "k");
        assert_eq!(nav.query(), "ak");
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn filter_shrink_clamps_cursor() {
        let mut nav = navigator(&["alpha", "beta", "gamma", "delta"]);
        press(&mut nav, Key::Down);
        press(&mut nav, Key::Down);
        press(&mut nav, Key::Down);
        type_text(&mut nav, "ta");
        assert_eq!(nav.filtered(), ["beta", "delta"]);
        assert_eq!(nav.cursor(), 1);

        type_text(&mut nav, "zz");
        assert!(nav.filtered().is_empty());
        assert_eq!(nav.cursor(), 0);

        press(&mut nav, Key::Backspace);
        press(&mut nav, Key::Backspace);
        assert_eq!(nav.query(), "ta");
        assert_eq!(nav.filtered(), ["beta", "delta"]);
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn cursor_invariant_holds_across_mixed_input() {
        let mut nav = navigator(&["dev", "prod", "prod-eu", "staging", "sandbox"]);
        let keys = [
            Key::Down,
            Key::Down,
            Key::Down,
            Key::Char('p'),
            Key::Down,
            Key::Down,
            Key::Char('-'),
            Key::Up,
            Key::Char('x'),
            Key::Down,
            Key::Backspace,
            Key::Backspace,
            Key::Backspace,
            Key::Down,
            Key::Down,
            Key::Down,
            Key::Down,
            Key::Down,
            Key::Char('a'),
            Key::Up,
            Key::Backspace,
        ];
        for key in keys {
            press(&mut nav, key);
            if nav.filtered().is_empty() {
                assert_eq!(nav.cursor(), 0, "after {key:?}");
            } else {
                assert!(nav.cursor() < nav.filtered().len(), "after {key:?}");
            }
        }
    }

    #[test]
    fn backspace_on_empty_query_is_harmless() {
        let mut nav = navigator(&["default"]);
        press(&mut nav, Key::Backspace);
        assert_eq!(nav.query(), "");
        assert_eq!(nav.filtered(), ["default"]);
    }

    #[test]
    fn non_ascii_input_is_dropped() {
        let mut nav = navigator(&["default", "prod"]);
        type_text(&mut nav, "pé\tr");
        assert_eq!(nav.query(), "pr");
    }

    #[test]
    fn confirm_profile_dispatches_region_load_and_tick() {
        let mut nav = navigator(&["default", "prod"]);
        press(&mut nav, Key::Down);
        let commands = press(&mut nav, Key::Enter);
        assert_eq!(
            commands,
            vec![
                Command::LoadRegions {
                    profile: "prod".into()
                },
                Command::ScheduleTick
            ]
        );
        assert!(nav.is_loading());
        assert_eq!(nav.stage(), Stage::ProfileSelect);
        assert_eq!(nav.selection().profile.as_deref(), Some("prod"));
    }

    #[test]
    fn loading_gate_ignores_everything_but_quit() {
        let mut nav = navigator(&["default", "prod", "staging"]);
        press(&mut nav, Key::Enter);
        for key in [
            Key::Down,
            Key::Char('j'),
            Key::Char('p'),
            Key::Backspace,
            Key::Enter,
        ] {
            assert!(press(&mut nav, key).is_empty());
            assert_eq!(nav.cursor(), 0);
            assert_eq!(nav.query(), "");
            assert!(nav.is_loading());
        }
        press(&mut nav, Key::Esc);
        assert_eq!(nav.outcome(), Some(Outcome::Aborted));
    }

    #[test]
    fn force_quit_works_from_any_stage() {
        let (mut nav, _) = on_instances(&["i-1"]);
        press(&mut nav, Key::ForceQuit);
        assert_eq!(nav.outcome(), Some(Outcome::Aborted));
        assert!(nav.update(Message::Tick).is_empty());
    }

    #[test]
    fn confirm_on_empty_filter_fails() {
        let mut nav = navigator(&["default", "prod"]);
        type_text(&mut nav, "nothing");
        assert!(press(&mut nav, Key::Enter).is_empty());
        assert_eq!(
            nav.outcome(),
            Some(Outcome::Failed(SelectorError::EmptySelection {
                stage: Stage::ProfileSelect
            }))
        );
    }

    #[test]
    fn empty_region_list_fails_on_confirm() {
        let mut nav = navigator(&["prod"]);
        press(&mut nav, Key::Enter);
        nav.update(Message::RegionsLoaded(Ok(Vec::new())));
        assert_eq!(nav.stage(), Stage::RegionSelect);
        press(&mut nav, Key::Enter);
        assert_eq!(
            nav.error(),
            Some(&SelectorError::EmptySelection {
                stage: Stage::RegionSelect
            })
        );
    }

    #[test]
    fn region_timeout_ends_run_on_profile_stage() {
        let mut nav = navigator(&["prod"]);
        press(&mut nav, Key::Enter);
        let err = SelectorError::Timeout {
            kind: LookupKind::Regions,
            after: Duration::from_secs(15),
        };
        nav.update(Message::RegionsLoaded(Err(err.clone())));
        assert_eq!(nav.stage(), Stage::ProfileSelect);
        assert!(!nav.is_loading());
        assert_eq!(nav.outcome(), Some(Outcome::Failed(err)));
    }

    #[test]
    fn list_result_resets_query_and_cursor() {
        let mut nav = navigator(&["default", "prod"]);
        type_text(&mut nav, "pro");
        press(&mut nav, Key::Enter);
        nav.update(Message::RegionsLoaded(Ok(strings(&["us-east-1", "us-west-2"]))));
        assert_eq!(nav.stage(), Stage::RegionSelect);
        assert_eq!(nav.query(), "");
        assert_eq!(nav.cursor(), 0);
        assert_eq!(nav.filtered(), ["us-east-1", "us-west-2"]);
    }

    #[test]
    fn unexpected_list_result_is_ignored() {
        let mut nav = navigator(&["prod"]);
        nav.update(Message::InstancesLoaded(Ok(strings(&["i-1"]))));
        nav.update(Message::RegionsLoaded(Ok(strings(&["us-east-1"]))));
        assert_eq!(nav.stage(), Stage::ProfileSelect);
        assert_eq!(nav.filtered(), ["prod"]);
    }

    #[test]
    fn end_to_end_selection() {
        let mut nav = navigator(&["default", "prod"]);
        press(&mut nav, Key::Down);
        press(&mut nav, Key::Enter);
        nav.update(Message::RegionsLoaded(Ok(strings(&["us-east-1", "us-west-2"]))));
        assert!(nav.update(Message::Tick).is_empty());
        press(&mut nav, Key::Down);
        let commands = press(&mut nav, Key::Enter);
        assert_eq!(
            commands,
            vec![
                Command::LoadInstances {
                    profile: "prod".into(),
                    region: "us-west-2".into()
                },
                Command::ScheduleTick
            ]
        );
        nav.update(Message::InstancesLoaded(Ok(strings(&["i-1 (web)", "i-2 (db)"]))));
        type_text(&mut nav, "db");
        assert_eq!(nav.filtered(), ["i-2 (db)"]);
        assert!(press(&mut nav, Key::Enter).is_empty());
        assert_eq!(nav.stage(), Stage::Done);
        assert_eq!(
            nav.outcome(),
            Some(Outcome::Confirmed {
                profile: "prod".into(),
                region: "us-west-2".into(),
                instance: "i-2".into(),
            })
        );
    }

    #[test]
    fn entering_instances_previews_first_entry() {
        let (nav, commands) = on_instances(&["i-1 (web)", "i-2 (db)"]);
        assert_eq!(commands, vec![load_tags("i-1")]);
        assert_eq!(nav.preview().target_id.as_deref(), Some("i-1"));
        assert!(nav.preview().loading);

        let (nav, commands) = on_instances(&[]);
        assert!(commands.is_empty());
        assert_eq!(nav.preview(), &PreviewState::default());
    }

    #[test]
    fn cursor_move_retargets_preview() {
        let (mut nav, _) = on_instances(&["i-1 (web)", "i-2 (db)"]);
        assert_eq!(press(&mut nav, Key::Down), vec![load_tags("i-2")]);
        assert_eq!(nav.preview().target_id.as_deref(), Some("i-2"));
        assert!(press(&mut nav, Key::Down).is_empty());

        nav.update(tags_loaded("i-2", vec![tag("Name", "db")]));
        assert!(!nav.preview().loading);
        assert_eq!(nav.preview().tags, vec![tag("Name", "db")]);
    }

    #[test]
    fn filtering_retargets_preview_when_highlight_changes() {
        let (mut nav, _) = on_instances(&["i-1 (web)", "i-2 (db)", "i-3 (dbreplica)"]);
        assert_eq!(type_text(&mut nav, "db"), vec![load_tags("i-2")]);
        assert_eq!(type_text(&mut nav, "r"), vec![load_tags("i-3")]);
        assert_eq!(nav.preview().target_id.as_deref(), Some("i-3"));

        let commands = type_text(&mut nav, "zz");
        assert!(commands.is_empty());
        assert_eq!(nav.preview(), &PreviewState::default());
    }

    #[test]
    fn late_result_for_previous_target_is_dropped() {
        let (mut nav, _) = on_instances(&["i-a (one)", "i-b (two)"]);
        press(&mut nav, Key::Down);
        assert_eq!(nav.preview().target_id.as_deref(), Some("i-b"));

        nav.update(tags_loaded("i-a", vec![tag("Name", "one")]));
        assert!(nav.preview().loading);
        assert!(nav.preview().tags.is_empty());

        nav.update(tags_loaded("i-b", vec![tag("Name", "two")]));
        nav.update(tags_loaded("i-a", vec![tag("Name", "one")]));
        assert_eq!(nav.preview().target_id.as_deref(), Some("i-b"));
        assert_eq!(nav.preview().tags, vec![tag("Name", "two")]);
        assert!(!nav.preview().loading);
    }

    #[test]
    fn preview_failure_leaves_no_tags() {
        let (mut nav, _) = on_instances(&["i-1"]);
        let commands = nav.update(Message::TagsLoaded {
            instance_id: "i-1".into(),
            result: Err(SelectorError::Timeout {
                kind: LookupKind::Tags,
                after: Duration::from_secs(5),
            }),
        });
        assert!(commands.is_empty());
        assert!(!nav.preview().loading);
        assert!(nav.preview().tags.is_empty());
        assert_eq!(nav.stage(), Stage::InstanceSelect);
        assert!(nav.outcome().is_none());
    }

    #[test]
    fn tick_chain_runs_only_while_loading() {
        let mut nav = navigator(&["prod"]);
        assert!(nav.update(Message::Tick).is_empty());
        assert_eq!(nav.spinner_frame(), 1);

        press(&mut nav, Key::Enter);
        assert_eq!(nav.update(Message::Tick), vec![Command::ScheduleTick]);
        assert_eq!(nav.spinner_frame(), 2);

        nav.update(Message::RegionsLoaded(Ok(strings(&["us-east-1"]))));
        assert!(nav.update(Message::Tick).is_empty());
        assert_eq!(nav.spinner_frame(), 3);
    }

    #[test]
    fn tick_already_pending_is_not_doubled() {
        let mut nav = navigator(&["prod"]);
        press(&mut nav, Key::Enter);
        nav.update(Message::RegionsLoaded(Ok(strings(&["us-east-1"]))));
        let commands = press(&mut nav, Key::Enter);
        assert_eq!(
            commands,
            vec![Command::LoadInstances {
                profile: "prod".into(),
                region: "us-east-1".into()
            }]
        );
    }

    #[test]
    fn spinner_wraps_around() {
        let mut nav = navigator(&["prod"]);
        for _ in 0..SPINNER_FRAMES.len() {
            nav.update(Message::Tick);
        }
        assert_eq!(nav.spinner_frame(), 0);
    }
}
