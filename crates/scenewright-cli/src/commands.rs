use anyhow::{Context, Result};
use clap::Args;
use relative_path::RelativePathBuf;
use scenewright_config::ProjectSettings;
use scenewright_engine::{
    CompletionSources, Diagnostic, DocumentIndex, ExportFormat, ExportOptions, ScriptBuffer,
    ScriptStatistics, Severity, StatisticsAggregator, TextEdit, index_document, io,
    plan_resequence, plan_scene_insertion, validate_document,
};
use std::fmt::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ExportArgs {
    pub file: PathBuf,

    /// txt, html or fountain
    #[arg(long, short)]
    pub format: ExportFormat,

    /// Write to this file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Title for the title block (overrides the project setting)
    #[arg(long)]
    pub title: Option<String>,

    /// Author for the title block (overrides the project setting)
    #[arg(long)]
    pub author: Option<String>,

    /// Leave scene numbers out of headings
    #[arg(long)]
    pub no_scene_numbers: bool,
}

/// A script file opened from the command line, addressed relative to its
/// directory, which is also the project whose settings apply.
struct Script {
    root: PathBuf,
    relative: RelativePathBuf,
    text: String,
}

impl Script {
    fn open(path: &Path) -> Result<Self> {
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = path
            .file_name()
            .with_context(|| format!("'{}' is not a script file", path.display()))?;
        let relative = RelativePathBuf::from_path(name)
            .with_context(|| format!("'{}' is not a usable file name", path.display()))?;
        let text = io::read_script(&relative, &root)
            .with_context(|| format!("Failed to read script '{}'", path.display()))?;

        Ok(Self {
            root,
            relative,
            text,
        })
    }

    fn settings(&self) -> Result<ProjectSettings> {
        Ok(ProjectSettings::load_for_project(&self.root)?)
    }

    /// Applies `edits` to the script text and writes it back.
    fn apply_and_save(&self, edits: &[TextEdit]) -> Result<ScriptBuffer> {
        let mut buffer = ScriptBuffer::from_text(&self.text);
        buffer.apply(edits)?;
        io::write_script(&self.relative, &self.root, &buffer.text())
            .context("Failed to save script")?;
        Ok(buffer)
    }
}

pub fn scenes(file: &Path) -> Result<()> {
    let script = Script::open(file)?;
    print!("{}", scene_table(&index_document(&script.text)));
    Ok(())
}

pub fn stats(file: &Path, json: bool) -> Result<()> {
    let script = Script::open(file)?;
    let stats = StatisticsAggregator::new().summarize(&index_document(&script.text));
    if json {
        println!("{}", serde_json::to_string_pretty(&*stats)?);
    } else {
        print!("{}", stats_report(&stats));
    }
    Ok(())
}

/// Prints diagnostics; returns whether any of them is an error.
pub fn check(file: &Path) -> Result<bool> {
    let script = Script::open(file)?;
    let diagnostics = validate_document(&script.text);
    print!("{}", diagnostics_report(file, &diagnostics));
    Ok(diagnostics.iter().any(|d| d.severity == Severity::Error))
}

pub fn export(args: &ExportArgs) -> Result<()> {
    let script = Script::open(&args.file)?;
    let settings = script.settings()?;
    let options = ExportOptions {
        title: args.title.clone().or(settings.export.title),
        author: args.author.clone().or(settings.export.author),
        include_scene_numbers: settings.export.include_scene_numbers && !args.no_scene_numbers,
    };

    let index = index_document(&script.text);
    let rendered = scenewright_engine::export(&script.text, &index, args.format, &options);

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            log::info!("exported {} to {}", args.format, path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

pub fn new_scene(file: &Path, cursor_line: usize) -> Result<()> {
    let script = Script::open(file)?;
    let index = index_document(&script.text);
    let plan = plan_scene_insertion(&index, &script.text, cursor_line)?;
    script.apply_and_save(&plan.edits)?;

    println!(
        "Inserted scene {} at line {}; renumbered {} later scene(s)",
        plan.number,
        plan.cursor.line + 1,
        plan.edits.len() - 1
    );
    Ok(())
}

pub fn renumber(file: &Path) -> Result<()> {
    let script = Script::open(file)?;
    let index = index_document(&script.text);
    let edits = plan_resequence(&index, &script.text);
    if edits.is_empty() {
        println!("Scene numbers are already in sequence");
        return Ok(());
    }
    script.apply_and_save(&edits)?;
    println!("Renumbered {} scene header(s)", edits.len());
    Ok(())
}

/// Prints what an editor popup would offer for `prefix`, one candidate per
/// line, or the whole completion as JSON.
pub fn suggest(file: &Path, prefix: &str, json: bool) -> Result<()> {
    let script = Script::open(file)?;
    let sources = completion_sources(script.settings()?, &index_document(&script.text));
    let completion = scenewright_engine::suggest(prefix, &sources);

    if json {
        println!("{}", serde_json::to_string(&completion)?);
    } else if let Some(completion) = completion {
        for candidate in &completion.candidates {
            println!("{candidate}");
        }
    }
    Ok(())
}

/// Project vocabulary first, then names the script already uses.
fn completion_sources(settings: ProjectSettings, index: &DocumentIndex) -> CompletionSources {
    CompletionSources {
        characters: settings.characters,
        emotions: settings.emotions,
        times_of_day: settings.times_of_day,
    }
    .with_index_characters(index)
}

fn scene_table(index: &DocumentIndex) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<7} {:<6} {:<4} {:<16} {:<24} {:>6} {:>5} FB",
        "SCENE", "TIME", "IO", "LOCATION", "CHARACTERS", "WORDS", "MIN"
    );
    for scene in &index.scenes {
        let _ = writeln!(
            out,
            "{:<7} {:<6} {:<4} {:<16} {:<24} {:>6} {:>5} {}",
            scene.number().to_string(),
            scene.time_of_day,
            scene.location_kind.token(),
            scene.location,
            scene.characters.join(" "),
            scene.word_count,
            scene.duration_minutes,
            if scene.is_flashback { "*" } else { "" }
        );
    }
    out
}

fn stats_report(stats: &ScriptStatistics) -> String {
    let mut out = String::new();
    let totals = &stats.totals;
    let _ = writeln!(
        out,
        "{} scenes in {} episodes, {} words, about {} min ({} flashback scenes)",
        totals.scenes, totals.episodes, totals.words, totals.duration_minutes, totals.flashback_scenes
    );

    if !stats.episodes.is_empty() {
        let _ = writeln!(out, "\nEpisodes:");
        for episode in &stats.episodes {
            let _ = writeln!(
                out,
                "  {:>3}  {:>3} scenes  {:>6} words  {:>5} min",
                episode.episode, episode.scenes, episode.words, episode.duration_minutes
            );
        }
    }

    if !stats.characters.is_empty() {
        let _ = writeln!(out, "\nCharacters:");
        for character in &stats.characters {
            let _ = writeln!(
                out,
                "  {}  {} scenes, {} lines, {} words",
                character.name, character.scenes, character.dialogue_lines, character.dialogue_words
            );
        }
    }

    if !stats.tags.is_empty() {
        let _ = writeln!(out, "\nTags:");
        for tag in &stats.tags {
            let scenes: Vec<String> = tag.scenes.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "  {}  x{}  {}", tag.tag, tag.occurrences, scenes.join(" "));
        }
    }
    out
}

fn diagnostics_report(file: &Path, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let severity = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let _ = writeln!(
            out,
            "{}:{}:{}: {severity}: {}",
            file.display(),
            diagnostic.line + 1,
            diagnostic.offset + 1,
            diagnostic.message
        );
    }
    out
}
