//! Interactive standardized-patient interview runner.
//!
//! Quick testing without any frontend: load a persona, type clinician turns,
//! read patient replies with their rubric tags, and score the session with
//! `/score`.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use osler_core::models::persona::Persona;
use osler_core::models::session::SessionState;
use osler_llm::prompt::{Cooperation, PainExpression, Talkativeness};
use osler_llm::{
    BehaviorProfile, EchoGenerator, StreamEvent, TextGenerator, TurnOptions, stream_patient_reply,
};
use osler_personas::PersonaStore;
use osler_rubric::score_from_tags;

#[derive(Parser)]
#[command(author, version, about = "Standardized-patient interview simulator", long_about = None)]
struct Cli {
    /// Directory of `{patient_id}.persona.json` files.
    #[arg(short, long, value_name = "DIR", default_value = "personas")]
    personas: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available personas.
    List,

    /// List invokable Bedrock chat models.
    Models,

    /// Run an interactive interview with one patient.
    Chat {
        /// Patient identifier, e.g. P-0002.
        patient_id: String,

        /// Reply backend.
        #[arg(long, value_enum, default_value_t = Backend::Deterministic)]
        backend: Backend,

        /// Bedrock inference profile ID (see `models`). Defaults to the
        /// first discovered model.
        #[arg(long)]
        model: Option<String>,

        /// Sampling temperature for generative backends.
        #[arg(long, default_value_t = 0.2)]
        temperature: f32,

        #[arg(long, value_enum, default_value_t = CooperationArg::Willing)]
        cooperation: CooperationArg,

        #[arg(long, value_enum, default_value_t = PainArg::Normal)]
        pain_expression: PainArg,

        #[arg(long, value_enum, default_value_t = TalkArg::Normal)]
        talkativeness: TalkArg,

        /// Free-text additions to the behavior profile.
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Scripted replies straight from the persona record.
    Deterministic,
    /// Offline echo backend, streams the question back.
    Echo,
    /// AWS Bedrock Converse API.
    Bedrock,
}

#[derive(Clone, Copy, ValueEnum)]
enum CooperationArg {
    Willing,
    Resistant,
}

#[derive(Clone, Copy, ValueEnum)]
enum PainArg {
    Stoic,
    Normal,
    Dramatic,
}

#[derive(Clone, Copy, ValueEnum)]
enum TalkArg {
    Normal,
    Verbose,
}

impl From<CooperationArg> for Cooperation {
    fn from(arg: CooperationArg) -> Self {
        match arg {
            CooperationArg::Willing => Cooperation::Willing,
            CooperationArg::Resistant => Cooperation::Resistant,
        }
    }
}

impl From<PainArg> for PainExpression {
    fn from(arg: PainArg) -> Self {
        match arg {
            PainArg::Stoic => PainExpression::Stoic,
            PainArg::Normal => PainExpression::Normal,
            PainArg::Dramatic => PainExpression::Dramatic,
        }
    }
}

impl From<TalkArg> for Talkativeness {
    fn from(arg: TalkArg) -> Self {
        match arg {
            TalkArg::Normal => Talkativeness::Normal,
            TalkArg::Verbose => Talkativeness::Verbose,
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = PersonaStore::new(&cli.personas);

    match cli.command {
        Commands::List => {
            let summaries = store.list()?;
            if summaries.is_empty() {
                println!("No personas found in {}", store.dir().display());
                return Ok(());
            }
            for s in summaries {
                println!(
                    "{}  {} ({}) — {}",
                    s.patient_id,
                    s.preferred_name.as_deref().unwrap_or("unnamed"),
                    s.age.map_or("?".to_string(), |a| a.to_string()),
                    s.condition.as_deref().unwrap_or("condition unknown"),
                );
            }
        }

        Commands::Models => {
            let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            for m in osler_bedrock::list_chat_models(&config).await? {
                println!("{}  {}", m.model_id, m.name);
            }
        }

        Commands::Chat {
            patient_id,
            backend,
            model,
            temperature,
            cooperation,
            pain_expression,
            talkativeness,
            notes,
        } => {
            let persona = store.load(&patient_id)?;
            println!(
                "Loaded persona for {patient_id}: {} / {}",
                persona.identity.preferred_name.as_deref().unwrap_or("unnamed"),
                persona.condition.as_deref().unwrap_or("condition unknown"),
            );

            let options = TurnOptions {
                temperature,
                behavior: BehaviorProfile {
                    cooperation: cooperation.into(),
                    pain_expression: pain_expression.into(),
                    talkativeness: talkativeness.into(),
                    custom_instructions: notes,
                },
            };

            let generator: Option<Arc<dyn TextGenerator>> = match backend {
                Backend::Deterministic => None,
                Backend::Echo => Some(Arc::new(EchoGenerator)),
                Backend::Bedrock => {
                    let config =
                        aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                    let model_id = match model {
                        Some(id) => id,
                        None => {
                            let models = osler_bedrock::list_chat_models(&config).await?;
                            let first = models
                                .first()
                                .ok_or_else(|| eyre::eyre!("no Bedrock chat models available"))?;
                            println!("Using model {}", first.model_id);
                            first.model_id.clone()
                        }
                    };
                    Some(Arc::new(osler_bedrock::BedrockGenerator::new(
                        config, model_id,
                    )))
                }
            };

            run_interview(&persona, generator, options).await?;
        }
    }

    Ok(())
}

/// The interview loop. Session tags accumulate across turns; `/score`
/// reports them against the rubric, and a final report prints on exit.
async fn run_interview(
    persona: &Persona,
    generator: Option<Arc<dyn TextGenerator>>,
    options: TurnOptions,
) -> eyre::Result<()> {
    let mut state = SessionState::default();
    let mut session_tags: Vec<String> = Vec::new();

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let user = line?.trim().to_string();

        if user.is_empty() || user.eq_ignore_ascii_case("quit") || user.eq_ignore_ascii_case("exit")
        {
            break;
        }
        if user == "/score" {
            print_score(&session_tags);
            continue;
        }

        let turn_tags = match &generator {
            None => {
                let outcome = osler_engine::patient_reply(&user, persona, &state);
                println!("Patient: {}", outcome.reply);
                state = outcome.state;
                outcome.tags
            }
            Some(generator) => {
                let mut rx = stream_patient_reply(
                    Arc::clone(generator),
                    user,
                    persona,
                    &state,
                    options.clone(),
                );

                print!("Patient: ");
                std::io::stdout().flush()?;

                let mut tags = Vec::new();
                while let Some(event) = rx.recv().await {
                    match event? {
                        StreamEvent::Token(token) => {
                            print!("{token}");
                            std::io::stdout().flush()?;
                        }
                        StreamEvent::Done {
                            state: new_state,
                            tags: new_tags,
                        } => {
                            state = new_state;
                            tags = new_tags;
                        }
                    }
                }
                println!();
                tags
            }
        };

        let rendered: Vec<String> = turn_tags.iter().map(|t| t.to_string()).collect();
        println!("[tags: {}]", rendered.join(", "));
        session_tags.extend(rendered);
    }

    if !session_tags.is_empty() {
        println!();
        print_score(&session_tags);
    }

    Ok(())
}

fn print_score(session_tags: &[String]) {
    let report = score_from_tags(session_tags);
    println!("Score: {}/{} ({}%)", report.score, report.max, report.percent);
    for d in &report.details {
        let mark = if d.hit { "x" } else { " " };
        println!("  [{mark}] {} ({}/{})", d.label, d.points, d.max);
    }
}
