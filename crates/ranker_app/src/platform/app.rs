use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use ranker_core::{update, AppState, Msg, RowLayout, Stage};
use ranker_logging::{ranker_debug, ranker_info, ranker_warn};

use super::cli::Args;
use super::commands::{self, Command, HELP_TEXT};
use super::effects::EffectRunner;
use super::render::render;

/// How long one loop turn waits for input before checking the engine again.
const TICK: Duration = Duration::from_millis(50);

pub fn run_app(args: Args) -> anyhow::Result<()> {
    if !ranker_logging::initialize(args.log.into(), args.log_level()) {
        eprintln!("Warning: logging could not be initialized");
    }
    ranker_info!("Starting ranker for identity {}", args.identity);

    let service = args.build_service()?;
    let runner =
        EffectRunner::new(service, &args.identity).context("Failed to start the service engine")?;

    let mut driver = Driver::new(runner, io::stdout());
    driver.start()?;
    let lines = spawn_stdin_reader();
    driver.run(&lines)?;
    ranker_info!("Ranker finished");
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    ranker_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
    });
    line_rx
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Owns the wizard state and feeds it typed commands and engine completions.
struct Driver<W: Write> {
    state: AppState,
    runner: EffectRunner,
    layout: RowLayout,
    out: W,
}

impl<W: Write> Driver<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            layout: RowLayout::default(),
            out,
        }
    }

    fn start(&mut self) -> io::Result<()> {
        let (state, effects) = ranker_core::start();
        self.state = state;
        self.runner.enqueue(effects);
        writeln!(self.out, "Type `help` for commands.")?;
        self.render()
    }

    /// Loops until `quit` or the input closes. Typed lines are held back while
    /// a request is outstanding, so scripted input runs step by step.
    fn run(&mut self, lines: &mpsc::Receiver<String>) -> io::Result<()> {
        loop {
            if !self.ready() {
                self.pump(TICK)?;
                continue;
            }
            self.pump(Duration::ZERO)?;
            match lines.recv_timeout(TICK) {
                Ok(line) => {
                    if self.handle_line(&line)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }
        }
    }

    fn ready(&self) -> bool {
        self.state.stage() != Stage::Loading
            && !self.state.is_busy()
            && !self.state.awaiting_chat_reply()
    }

    /// Applies engine completions: waits up to `timeout` for the first one.
    fn pump(&mut self, timeout: Duration) -> io::Result<()> {
        if let Some(msg) = self.runner.recv_timeout(timeout) {
            self.dispatch(msg)?;
        }
        while let Some(msg) = self.runner.try_recv() {
            self.dispatch(msg)?;
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let command = match commands::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                return Ok(Flow::Continue);
            }
        };
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(self.out, "{HELP_TEXT}")?,
            command => {
                for msg in commands::to_msgs(command, self.state.stage(), &self.layout) {
                    self.dispatch(msg)?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        ranker_debug!("Dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let view = self.state.view();
        writeln!(self.out)?;
        for line in render(&view) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use ranker_engine::{
        LocalProgressService, NarrativeGenerator, ProgressService, ProgressStatus, ServiceError,
        UnavailableGenerator,
    };

    use super::*;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl NarrativeGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
            Ok(self.0.to_string())
        }
    }

    fn driver(service: Arc<dyn ProgressService>) -> Driver<Vec<u8>> {
        let runner = EffectRunner::new(service, "amy").unwrap();
        let mut driver = Driver::new(runner, Vec::new());
        driver.start().unwrap();
        settle(&mut driver);
        driver
    }

    fn settle(driver: &mut Driver<Vec<u8>>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !driver.ready() {
            assert!(Instant::now() < deadline, "engine did not answer");
            driver.pump(TICK).unwrap();
        }
    }

    fn type_lines(driver: &mut Driver<Vec<u8>>, lines: &[&str]) {
        for line in lines {
            assert_eq!(driver.handle_line(line).unwrap(), Flow::Continue);
            settle(driver);
        }
    }

    const JOBS: [&str; 5] = [
        "set 1 Vet",
        "set 2 Pilot",
        "set 3 Chef",
        "set 4 Teacher",
        "set 5 Artist",
    ];

    #[test]
    fn full_session_then_resume() {
        let dir = tempfile::tempdir().unwrap();
        let local = Arc::new(LocalProgressService::new(
            dir.path(),
            Arc::new(FixedGenerator(
                "1) Chef\nKitchens.\n2) Vet\nAnimals.\n3) Pilot\nSkies.\n\
                 4) Teacher\nClasses.\n5) Artist\nStudios.\n---\nGo for it!",
            )),
        ));

        let mut first = driver(local.clone());
        assert_eq!(first.state.stage(), Stage::Input);
        type_lines(&mut first, &JOBS);
        type_lines(&mut first, &["next", "drag 3 1", "next"]);

        assert_eq!(first.state.stage(), Stage::Results);
        let output = String::from_utf8(first.out.clone()).unwrap();
        assert!(output.contains("== Chef ==\n1) Chef\nKitchens."));
        assert!(output.contains("== Comparing your jobs ==\nGo for it!"));

        let record = local.store().load("amy").unwrap().unwrap();
        assert_eq!(record.status, ProgressStatus::Completed);
        assert_eq!(
            record.ranking,
            vec!["Chef", "Vet", "Pilot", "Teacher", "Artist"]
        );

        let second = driver(local);
        assert_eq!(second.state.stage(), Stage::Results);
        assert_eq!(
            second.state.rank_order(),
            vec!["Chef", "Vet", "Pilot", "Teacher", "Artist"]
        );
    }

    #[test]
    fn unavailable_generator_still_reaches_results() {
        let dir = tempfile::tempdir().unwrap();
        let local = Arc::new(LocalProgressService::new(
            dir.path(),
            Arc::new(UnavailableGenerator),
        ));

        let mut driver = driver(local.clone());
        type_lines(&mut driver, &JOBS);
        type_lines(&mut driver, &["next", "next"]);

        assert_eq!(driver.state.stage(), Stage::Results);
        assert!(driver.state.narrative().is_none());
        let record = local.store().load("amy").unwrap().unwrap();
        assert_eq!(record.status, ProgressStatus::InProgress);

        type_lines(&mut driver, &["ask Is it hard?"]);
        let output = String::from_utf8(driver.out.clone()).unwrap();
        assert!(output.contains("You: Is it hard?"));
        assert!(output.contains("Guide (error): "));
    }

    #[test]
    fn bad_commands_are_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let local = Arc::new(LocalProgressService::new(
            dir.path(),
            Arc::new(UnavailableGenerator),
        ));
        let mut driver = driver(local);

        assert_eq!(driver.handle_line("fly away").unwrap(), Flow::Continue);
        assert_eq!(driver.handle_line("quit").unwrap(), Flow::Quit);
        let output = String::from_utf8(driver.out.clone()).unwrap();
        assert!(output.contains("unknown command `fly`"));
    }
}
