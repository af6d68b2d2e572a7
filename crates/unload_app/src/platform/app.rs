use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::sync::mpsc;

use anyhow::{bail, Context, Result};
use unload_core::{update, AppState, Msg};
use unload_logging::{set_scan_seq, unload_error, unload_info};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::input::{parse_input, Command, Input};
use super::source::{self, LineSource, ScanSource, SourceEvent};
use super::{logging, ui};
use crate::Cli;

pub fn run_app(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    logging::initialize(config.log, config.level_filter()?, &config.output_dir);
    unload_info!("unload starting; reports go to {:?}", config.output_dir);

    let mut out = io::stdout();
    for line in ui::layout::banner(&config.output_dir, cli.scans.as_deref()) {
        writeln!(out, "{line}")?;
    }

    let mut app = App::new(config, out);
    if let Some(path) = &cli.manifest {
        app.dispatch(Msg::LoadManifestRequested(path.clone()))?;
    }

    let scan_source: Box<dyn ScanSource> = match &cli.scans {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open scan file {}", path.display()))?;
            Box::new(LineSource::new(BufReader::new(file)))
        }
        None => Box::new(LineSource::new(BufReader::new(io::stdin()))),
    };
    let (tx, rx) = mpsc::channel();
    source::spawn(scan_source, tx);

    for event in rx {
        match event {
            SourceEvent::Line(line) => {
                if app.handle_line(&line)? == Flow::Quit {
                    break;
                }
            }
            SourceEvent::Closed => {
                if cli.scans.is_some() && app.state.session().is_some() {
                    app.dispatch(Msg::ExportRequested)?;
                }
                break;
            }
            SourceEvent::Failed(err) => {
                unload_error!("scan source failed: {}", err);
                bail!("scan source failed: {err}");
            }
        }
    }

    unload_info!("session ended after {} scans", app.state.scan_count());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Owns the core state and feeds it messages one at a time.
struct App<W> {
    state: AppState,
    runner: EffectRunner,
    out: W,
    scan_seq: u64,
    paused: bool,
}

impl<W: Write> App<W> {
    fn new(config: AppConfig, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner: EffectRunner::new(config),
            out,
            scan_seq: 0,
            paused: false,
        }
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        match parse_input(line) {
            Input::Blank => {}
            Input::Scan(code) if self.paused => {
                unload_info!("scan {} ignored while paused", code);
                self.write_lines(vec![format!("PAUSED    {code}  not counted; type :resume")])?;
            }
            Input::Scan(code) => {
                self.scan_seq += 1;
                set_scan_seq(self.scan_seq);
                self.dispatch(Msg::ScanSubmitted(code))?;
            }
            Input::Command(Command::Load(path)) => self.dispatch(Msg::LoadManifestRequested(path))?,
            Input::Command(Command::Export) => self.dispatch(Msg::ExportRequested)?,
            Input::Command(Command::Status) => {
                let view = self.state.view();
                self.write_lines(ui::render::render(&view, ui::render::Detail::Full))?;
            }
            Input::Command(Command::Pause) => {
                self.paused = true;
                unload_info!("scanning paused");
                self.write_lines(vec!["Scanning paused.".to_string()])?;
            }
            Input::Command(Command::Resume) => {
                self.paused = false;
                unload_info!("scanning resumed");
                self.write_lines(vec!["Scanning resumed.".to_string()])?;
            }
            Input::Command(Command::Help) => self.write_lines(ui::layout::help_lines())?,
            Input::Command(Command::Quit) => return Ok(Flow::Quit),
            Input::Command(Command::Invalid(message)) => self.write_lines(vec![message])?,
        }
        Ok(Flow::Continue)
    }

    /// Runs `msg` and every follow-up message its effects produce, then
    /// renders once if anything changed.
    fn dispatch(&mut self, msg: Msg) -> Result<()> {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            queue.extend(self.runner.run(effects, &mut self.out));
        }

        if self.state.consume_dirty() {
            let view = self.state.view();
            self.write_lines(ui::render::render(&view, ui::render::Detail::Compact))?;
        }
        Ok(())
    }

    fn write_lines(&mut self, lines: Vec<String>) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn app_with_manifest(dir: &TempDir, export_on_complete: bool) -> App<Vec<u8>> {
        let manifest = dir.path().join("camion.csv");
        fs::write(
            &manifest,
            "codigo_barra,cantidad,ciudad\nA1,2,Lima\nB2,1,Cusco\n",
        )
        .unwrap();
        let config = AppConfig {
            output_dir: dir.path().join("out"),
            export_on_complete,
            ..AppConfig::default()
        };
        let mut app = App::new(config, Vec::new());
        app.handle_line(&format!(":load {}", manifest.display())).unwrap();
        app
    }

    fn output(app: &mut App<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut app.out)).unwrap()
    }

    #[test]
    fn scans_render_feedback_and_counter() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_manifest(&dir, false);
        assert!(output(&mut app).contains("Units unloaded: 0 of 3"));

        app.handle_line("A1-2").unwrap();
        let text = output(&mut app);
        assert!(text.starts_with("OK        A1-2"), "{text}");
        assert!(text.contains("Units unloaded: 1 of 3"));
        assert_eq!(app.scan_seq, 1);

        app.handle_line("ZZ").unwrap();
        let text = output(&mut app);
        assert!(text.starts_with("\x07REJECTED  ZZ"), "{text}");
    }

    #[test]
    fn completion_exports_when_configured() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_manifest(&dir, true);
        for scan in ["A1-1", "A1-2", "B2"] {
            app.handle_line(scan).unwrap();
        }
        let text = output(&mut app);
        assert!(text.contains("ALL UNITS UNLOADED"));
        assert!(text.contains("Report written to"));

        let reports: Vec<_> = fs::read_dir(dir.path().join("out"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert!(reports.iter().any(|name| name.starts_with("camion--") && name.ends_with(".csv")));
    }

    #[test]
    fn commands_do_not_count_as_scans() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_manifest(&dir, false);
        output(&mut app);

        assert_eq!(app.handle_line(":status").unwrap(), Flow::Continue);
        assert!(output(&mut app).contains("Manifest: "));
        app.handle_line(":help").unwrap();
        assert!(output(&mut app).contains(":export"));
        app.handle_line("   ").unwrap();
        assert_eq!(output(&mut app), "");
        assert_eq!(app.handle_line(":quit").unwrap(), Flow::Quit);
        assert_eq!(app.state.scan_count(), 0);
        assert_eq!(app.scan_seq, 0);
    }

    #[test]
    fn paused_scans_are_not_counted() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_manifest(&dir, false);
        app.handle_line(":pause").unwrap();
        app.handle_line("A1-1").unwrap();
        assert!(output(&mut app).contains("PAUSED    A1-1"));
        assert_eq!(app.state.scan_count(), 0);

        app.handle_line(":resume").unwrap();
        app.handle_line("A1-1").unwrap();
        assert!(output(&mut app).contains("Units unloaded: 1 of 3"));
        assert_eq!(app.state.session().unwrap().global_scanned(), 1);
    }

    #[test]
    fn bulk_line_renders_a_summarised_missing_list() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("bulk.csv");
        fs::write(&manifest, "codigo_barra,cantidad,ciudad\nA1,4000000000,Lima\n").unwrap();
        let mut app = App::new(AppConfig::default(), Vec::new());
        app.handle_line(&format!(":load {}", manifest.display())).unwrap();
        app.handle_line("A1-1").unwrap();

        let text = output(&mut app);
        assert!(text.contains("Units unloaded: 1 of 4000000000"), "{text}");
        assert!(text.contains("missing 2, 3, 4, 5, 6, 7, 8, 9 (+3999999991 more)"), "{text}");

        app.handle_line("A1-1").unwrap();
        let text = output(&mut app);
        assert!(text.contains("REJECTED  A1-1"), "{text}");
        assert!(text.contains("Units unloaded: 1 of 4000000000"), "{text}");
    }

    #[test]
    fn failed_load_is_reported_and_export_needs_a_manifest() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(AppConfig::default(), Vec::new());
        app.handle_line(":export").unwrap();
        assert!(output(&mut app).contains("nothing to export"));

        let missing = dir.path().join("absent.csv");
        app.handle_line(&format!(":load {}", missing.display())).unwrap();
        assert!(output(&mut app).contains("could not load"));
    }
}
