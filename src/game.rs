//! Scene host
//!
//! Owns the session-wide collaborators and exactly one [`GameState`] at a time.
//! Loading or restarting a level replaces that state wholesale.

use crate::audio::{AudioReactor, AudioSink, MemoryAudio};
use crate::consts::{FIRST_LEVEL, MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::GameError;
use crate::input::InputSource;
use crate::progression::{GAMEPLAY_PAGE, Session};
use crate::settings::Settings;
use crate::sim::{self, GameState, Level, LevelDesc, RestartReason};
use crate::ui::GameUi;

/// Assembles a [`Game`]; the UI facade is mandatory, audio is not
#[derive(Default)]
pub struct GameBuilder {
    settings: Settings,
    levels: Vec<LevelDesc>,
    ui: Option<Box<dyn GameUi>>,
    audio: Option<Box<dyn AudioSink>>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Append a level; the first one added is level [`FIRST_LEVEL`]
    pub fn level(mut self, desc: LevelDesc) -> Self {
        self.levels.push(desc);
        self
    }

    pub fn levels(mut self, descs: impl IntoIterator<Item = LevelDesc>) -> Self {
        self.levels.extend(descs);
        self
    }

    pub fn ui(mut self, ui: Box<dyn GameUi>) -> Self {
        self.ui = Some(ui);
        self
    }

    pub fn audio(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio = Some(sink);
        self
    }

    /// Build and enter the first level
    pub fn build(self) -> Result<Game, GameError> {
        let ui = self.ui.ok_or(GameError::MissingCollaborator("ui"))?;
        if self.levels.is_empty() {
            return Err(GameError::NoLevels);
        }
        self.settings.tuning.validate()?;

        let sink = self.audio.unwrap_or_else(|| {
            log::warn!("No audio sink wired - running silent");
            Box::new(MemoryAudio::new().0)
        });

        let session = Session::new(ui);
        let audio = AudioReactor::new(sink, self.settings.effective_volume());
        let state = GameState::new(
            FIRST_LEVEL,
            Level::load(&self.levels[0]),
            self.settings.tuning.clone(),
        );

        let mut game = Game {
            session,
            audio,
            levels: self.levels,
            settings: self.settings,
            state,
            accumulator: 0.0,
            loads: 0,
        };
        game.enter_scene();
        Ok(game)
    }
}

/// A running game session
pub struct Game {
    session: Session,
    audio: AudioReactor,
    levels: Vec<LevelDesc>,
    settings: Settings,
    state: GameState,
    accumulator: f32,
    loads: u32,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_level(&self) -> usize {
        self.state.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of scene loads so far, restarts included
    pub fn load_count(&self) -> u32 {
        self.loads
    }

    /// Build a fresh instance of level `index`
    ///
    /// Out-of-range indices are rejected with a warning and change nothing.
    pub fn load_level(&mut self, index: usize) -> bool {
        let Some(desc) = index
            .checked_sub(FIRST_LEVEL)
            .and_then(|i| self.levels.get(i))
        else {
            log::warn!("Invalid level index: {index}");
            return false;
        };

        self.audio.stop_all();
        self.state = GameState::new(index, Level::load(desc), self.settings.tuning.clone());
        self.enter_scene();
        true
    }

    /// Scene start for the freshly built `state`
    fn enter_scene(&mut self) {
        self.accumulator = 0.0;
        self.loads += 1;

        self.session.ui.reset_game();
        let page = self.session.page_to_show_on_reload();
        self.session.ui.show_page(page);
        log::info!(
            "Loaded level {} '{}' (page {page})",
            self.state.level_index,
            self.state.level.name
        );
    }

    /// Load a level from the level-select screen; it must be unlocked
    pub fn select_level(&mut self, index: usize) -> bool {
        if !self.session.progress.is_unlocked(index) {
            log::warn!(
                "Level {index} is locked (highest unlocked: {})",
                self.session.unlocked_level()
            );
            return false;
        }
        self.session.set_page_to_show_on_reload(GAMEPLAY_PAGE);
        self.load_level(index)
    }

    pub fn next_level(&mut self) -> bool {
        self.session.set_page_to_show_on_reload(GAMEPLAY_PAGE);
        self.load_level(self.state.level_index + 1)
    }

    /// Request a manual restart; the reload happens at the end of the next frame
    pub fn restart(&mut self) {
        sim::request_restart(
            &mut self.state,
            RestartReason::Manual,
            &mut self.session,
            &mut self.audio,
        );
    }

    /// Run one frame: input, fixed physics substeps, frame work, pending reload
    pub fn advance(&mut self, frame_dt: f32, input: &mut dyn InputSource) {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        let input = input.sample();
        sim::apply_input(&mut self.state, &input, &mut self.session, &mut self.audio);

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            sim::physics_tick(&mut self.state, SIM_DT, &mut self.session, &mut self.audio);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        sim::frame_tick(&mut self.state, dt, &mut self.session, &mut self.audio);

        if let Some(reason) = self.state.restart_requested() {
            log::info!("Reloading level {} after {reason:?} restart", self.state.level_index);
            self.load_level(self.state.level_index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedInput;
    use crate::sim::RunState;
    use crate::ui::Hud;
    use glam::Vec2;

    fn game(levels: usize) -> Game {
        Game::builder()
            .levels((0..levels).map(|_| LevelDesc::demo()))
            .ui(Box::new(Hud::new(3)))
            .build()
            .expect("game builds")
    }

    #[test]
    fn test_missing_ui_fails_fast() {
        let err = Game::builder().level(LevelDesc::demo()).build().err();
        assert!(matches!(err, Some(GameError::MissingCollaborator("ui"))));
    }

    #[test]
    fn test_no_levels() {
        let err = Game::builder().ui(Box::new(Hud::new(1))).build().err();
        assert!(matches!(err, Some(GameError::NoLevels)));
    }

    #[test]
    fn test_out_of_range_level_rejected() {
        let mut game = game(2);
        let loads = game.load_count();
        assert!(!game.load_level(0));
        assert!(!game.load_level(3));
        assert_eq!(game.load_count(), loads);
        assert_eq!(game.current_level(), FIRST_LEVEL);
    }

    #[test]
    fn test_locked_level_rejected() {
        let mut game = game(3);
        assert!(!game.select_level(2));
        game.session_mut().unlock_level(2);
        assert!(game.select_level(2));
        assert_eq!(game.current_level(), 2);
    }

    #[test]
    fn test_manual_restart_reloads_fresh_state() {
        let mut game = game(1);
        let mut input = ScriptedInput::new(Vec2::new(1.0, 0.0));
        for _ in 0..25 {
            game.advance(SIM_DT, &mut input);
        }
        assert!(game.state().player.body.velocity.x > 0.0);

        game.restart();
        game.advance(SIM_DT, &mut input);
        let player = &game.state().player;
        assert_eq!(player.run_state, RunState::Playing);
        assert_eq!(player.score, 0);
        assert_eq!(player.elapsed, 0.0);
        assert_eq!(player.body.position, game.state().level.spawn);
        assert_eq!(game.load_count(), 2);
    }
}
