mod catalog;
mod presenter;

use catalog::FileApi;
use clap::{Args, Parser, Subcommand};
use presenter::{AnswerParseError, FormPresenter, RenderMode, Verbosity};
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use survey_form::{
    FormConfig, FormError, FormRuntime, HomeView, Message, ModalAction, Phase, RecordingNavigator,
    Stage,
};
use survey_spec::{
    Control, EditOutcome, QuestionList, RenderQuestion, Submission, Survey, SurveyId, UserAnswer,
    answers_schema, survey_schema, validate,
};
use tracing_subscriber::{EnvFilter, fmt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const LOG_ENV: &str = "SURVEY_LOG";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Text-based survey client",
    long_about = "Lists published surveys, takes them interactively and checks answer files offline"
)]
struct Cli {
    /// Directory holding surveys.json and the submissions folder.
    #[arg(long, global = true, env = "SURVEY_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,
    /// Optional JSON file with form settings.
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,
    /// Show verbose output (status lines, hints, debug logs).
    #[arg(long, global = true, alias = "debug")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the published surveys.
    List,
    /// Answer a survey in a text shell and submit it.
    Take {
        /// Identifier of the survey to answer.
        #[arg(long, value_name = "ID")]
        survey: SurveyId,
        /// Also print the submitted answers as JSON.
        #[arg(long)]
        answers_json: bool,
        /// Output used by the `show` command.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Validate an answers file against a survey file.
    Validate {
        /// Path to the survey JSON.
        #[arg(long, value_name = "SURVEY")]
        survey_file: PathBuf,
        /// Path to a submission JSON or a bare list of answers.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Reorder or remove questions of a survey file.
    Edit {
        /// Path to the survey JSON.
        #[arg(long, value_name = "SURVEY")]
        survey_file: PathBuf,
        #[command(flatten)]
        operation: EditOperation,
        /// Where to write the edited survey; defaults to overwriting the input.
        #[arg(long, value_name = "OUT")]
        out: Option<PathBuf>,
    },
    /// Print the JSON Schema of a survey document.
    Schema {
        /// Describe submission files instead of surveys.
        #[arg(long)]
        answers: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct EditOperation {
    /// Move question N (1-based) one place up.
    #[arg(long, value_name = "N")]
    move_up: Option<usize>,
    /// Move question N (1-based) one place down.
    #[arg(long, value_name = "N")]
    move_down: Option<usize>,
    /// Remove question N (1-based).
    #[arg(long, value_name = "N")]
    remove: Option<usize>,
}

/// Answers accepted by `validate`: a stored submission or just its answers.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswersFile {
    Submission(Submission),
    Answers(Vec<UserAnswer>),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::List => run_list(&cli.data_dir),
        Command::Take {
            survey,
            answers_json,
            format,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let presenter =
                FormPresenter::new(Verbosity::from_verbose(cli.verbose), format, answers_json);
            run_take(&cli.data_dir, survey, config, presenter)
        }
        Command::Validate {
            survey_file,
            answers,
        } => run_validate(&survey_file, &answers),
        Command::Edit {
            survey_file,
            operation,
            out,
        } => run_edit(&survey_file, operation, out),
        Command::Schema { answers } => {
            let schema = if answers {
                answers_schema()
            } else {
                survey_schema()
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> CliResult<FormConfig> {
    match path {
        Some(path) => Ok(FormConfig::from_json(&fs::read_to_string(path)?)?),
        None => Ok(FormConfig::default()),
    }
}

fn run_list(data_dir: &Path) -> CliResult<()> {
    let api = FileApi::new(data_dir);
    let mut home = HomeView::new();
    home.load(&api);
    if let Some(error) = home.error() {
        return Err(error.into());
    }
    let presenter = FormPresenter::new(Verbosity::Clean, RenderMode::Text, false);
    presenter.show_cards(home.cards());
    Ok(())
}

fn run_take(
    data_dir: &Path,
    survey_id: SurveyId,
    config: FormConfig,
    mut presenter: FormPresenter,
) -> CliResult<()> {
    let api = FileApi::new(data_dir);
    let mut runtime = FormRuntime::start(api, RecordingNavigator::default(), survey_id, config);
    let mut walked = false;

    loop {
        match runtime.form().phase() {
            Phase::Loading | Phase::Submitting => {
                return Err("survey form stopped while waiting for the backend".into());
            }
            Phase::Unavailable => {
                let text = match runtime.form().current_modal() {
                    Some(modal) => {
                        presenter.show_modal(&modal);
                        modal.text
                    }
                    None => format!("survey {} is unavailable", survey_id),
                };
                runtime.dispatch(Message::Modal(ModalAction::Close));
                runtime.dispatch(Message::GoBack);
                return Err(text.into());
            }
            Phase::AwaitingUsername => {
                if let Some(modal) = runtime.form().current_modal() {
                    presenter.show_modal(&modal);
                }
                let message = match prompt_optional("Username (blank to skip)")? {
                    Some(name) => Message::UsernameSubmitted(name),
                    None => Message::Modal(ModalAction::Close),
                };
                runtime.dispatch(message);
            }
            Phase::Editing => {
                if let Some(payload) = runtime.form().render() {
                    presenter.show_header(&payload);
                }
                if !walked {
                    walked = true;
                    let total = question_count(&runtime);
                    for index in 0..total {
                        answer_question(&mut runtime, &presenter, index)?;
                    }
                    continue;
                }
                if let Some(payload) = runtime.form().render() {
                    presenter.show_status(&payload);
                }
                let command = prompt_line(
                    "Question number to change, 'show', 'submit' or 'exit'",
                    Some("submit"),
                )?;
                match command.to_lowercase().as_str() {
                    "submit" => runtime.dispatch(Message::SubmitPressed),
                    "show" => {
                        if let Some(payload) = runtime.form().render() {
                            presenter.show_form(&payload);
                        }
                    }
                    "exit" => {
                        runtime.dispatch(Message::TearDown);
                        println!("Survey left without submitting.");
                        return Ok(());
                    }
                    other => match other.parse::<usize>() {
                        Ok(number) if (1..=question_count(&runtime)).contains(&number) => {
                            answer_question(&mut runtime, &presenter, number - 1)?;
                        }
                        _ => println!("Unknown command '{}'.", other),
                    },
                }
            }
            Phase::Warning => {
                if let Some(modal) = runtime.form().current_modal() {
                    presenter.show_modal(&modal);
                }
                if let Some(form) = runtime.form().active()
                    && let Stage::Warning(warning) = form.stage()
                    && let FormError::Validation(errors) = &warning.cause
                {
                    presenter.show_errors(errors);
                }
                runtime.dispatch(Message::DismissWarning);
            }
            Phase::Confirming => {
                let confirmed = prompt_bool(survey_form::modal::CONFIRM_TEXT, true)?;
                let action = if confirmed {
                    ModalAction::Confirm
                } else {
                    ModalAction::Close
                };
                runtime.dispatch(Message::Modal(action));
            }
            Phase::Submitted => {
                if let Some(modal) = runtime.form().current_modal() {
                    presenter.show_modal(&modal);
                }
                if let Some(form) = runtime.form().active() {
                    presenter.show_completion(&form.submission());
                }
                runtime.dispatch(Message::Modal(ModalAction::Close));
                let mut home = HomeView::new();
                home.load(runtime.api());
                presenter.show_cards(home.cards());
                return Ok(());
            }
            Phase::Closed => return Ok(()),
        }
    }
}

fn question_count(runtime: &FormRuntime<FileApi, RecordingNavigator>) -> usize {
    runtime
        .form()
        .active()
        .map_or(0, |form| form.survey().questions.len())
}

fn current_question(
    runtime: &FormRuntime<FileApi, RecordingNavigator>,
    index: usize,
) -> Option<(RenderQuestion, usize)> {
    let payload = runtime.form().render()?;
    let total = payload.questions.len();
    payload
        .questions
        .into_iter()
        .nth(index)
        .map(|question| (question, total))
}

fn answer_question(
    runtime: &mut FormRuntime<FileApi, RecordingNavigator>,
    presenter: &FormPresenter,
    index: usize,
) -> CliResult<()> {
    let Some((question, total)) = current_question(runtime, index) else {
        return Ok(());
    };
    presenter.show_question(&question, total);
    loop {
        let raw = prompt_line("Answer", None)?;
        match parse_answer(&question, &raw) {
            Ok(messages) => {
                for message in messages {
                    runtime.dispatch(message);
                }
                break;
            }
            Err(err) => presenter.show_parse_error(&err),
        }
    }
    if let Some((updated, _)) = current_question(runtime, index) {
        presenter.show_message(&updated);
    }
    Ok(())
}

/// Turns one line of input into the messages that update `question`.
/// A blank line keeps the current answer; `-` clears open text and checkboxes.
fn parse_answer(question: &RenderQuestion, raw: &str) -> Result<Vec<Message>, AnswerParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    match question.control {
        Control::TextArea => {
            let text = if raw == "-" { "" } else { raw };
            Ok(vec![Message::TextChanged {
                question: question.id,
                text: text.to_string(),
            }])
        }
        Control::Radio => {
            let numbers = parse_choice_numbers(raw, question.choices.len())?;
            match numbers.as_slice() {
                [number] => Ok(vec![Message::AnswerChosen {
                    question: question.id,
                    answer: question.choices[number - 1].id,
                }]),
                _ => Err(AnswerParseError::new(
                    "pick exactly one answer",
                    Some(format!("a number between 1 and {}", question.choices.len())),
                )),
            }
        }
        Control::Checkbox => {
            let numbers = if raw == "-" {
                Vec::new()
            } else {
                parse_choice_numbers(raw, question.choices.len())?
            };
            let wanted = |position: usize| numbers.contains(&(position + 1));
            let unchecks = question
                .choices
                .iter()
                .enumerate()
                .filter(|(position, choice)| choice.selected && !wanted(*position))
                .map(|(_, choice)| (choice.id, false));
            let checks = numbers
                .iter()
                .map(|number| &question.choices[number - 1])
                .filter(|choice| !choice.selected)
                .map(|choice| (choice.id, true));
            Ok(unchecks
                .chain(checks)
                .map(|(answer, checked)| Message::AnswerToggled {
                    question: question.id,
                    answer,
                    checked,
                })
                .collect())
        }
    }
}

/// Parses comma or space separated 1-based answer numbers, dropping repeats.
fn parse_choice_numbers(raw: &str, count: usize) -> Result<Vec<usize>, AnswerParseError> {
    let mut numbers = Vec::new();
    for token in raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        let number = token.parse::<usize>().map_err(|_| {
            AnswerParseError::new(
                format!("'{}' is not an answer number", token),
                Some(format!("numbers between 1 and {}", count)),
            )
        })?;
        if number == 0 || number > count {
            return Err(AnswerParseError::new(
                format!("answer {} does not exist", number),
                Some(format!("numbers between 1 and {}", count)),
            ));
        }
        if !numbers.contains(&number) {
            numbers.push(number);
        }
    }
    Ok(numbers)
}

fn run_validate(survey_path: &Path, answers_path: &Path) -> CliResult<()> {
    let survey = read_survey(survey_path)?;
    let answers: AnswersFile = serde_json::from_str(&fs::read_to_string(answers_path)?)?;
    let answers = match answers {
        AnswersFile::Submission(submission) if submission.survey_id != survey.id => {
            return Err(format!(
                "answers belong to survey {}, not survey {}",
                submission.survey_id, survey.id
            )
            .into());
        }
        AnswersFile::Submission(submission) => submission.answers,
        AnswersFile::Answers(answers) => answers,
    };

    let errors = validate(&survey.questions, &answers);
    println!(
        "Validation result: {}",
        if errors.is_empty() { "valid" } else { "invalid" }
    );
    if errors.is_empty() {
        return Ok(());
    }
    println!("Errors:");
    for error in &errors {
        println!("  {} - {}", error.question_id, error.message);
    }
    Err("validation failed".into())
}

fn run_edit(survey_path: &Path, operation: EditOperation, out: Option<PathBuf>) -> CliResult<()> {
    let mut survey = read_survey(survey_path)?;
    let mut questions = QuestionList::new(std::mem::take(&mut survey.questions));
    let outcome = match operation {
        EditOperation {
            move_up: Some(number),
            ..
        } => questions.move_up(to_position(number)?),
        EditOperation {
            move_down: Some(number),
            ..
        } => questions.move_down(to_position(number)?),
        EditOperation {
            remove: Some(number),
            ..
        } => questions.remove(to_position(number)?),
        _ => return Err("no edit operation given".into()),
    };
    match outcome {
        EditOutcome::Moved { from, to } => {
            println!("Moved question {} to position {}", from + 1, to + 1)
        }
        EditOutcome::Removed(question) => {
            println!("Removed question {} ({})", question.id, question.text)
        }
        EditOutcome::Unchanged => return Err("question cannot be changed that way".into()),
    }
    survey.questions = questions.into_questions();
    let target = out.unwrap_or_else(|| survey_path.to_path_buf());
    fs::write(&target, serde_json::to_string_pretty(&survey)?)?;
    println!("Survey written to {}", target.display());
    Ok(())
}

fn to_position(number: usize) -> CliResult<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| "question numbers start at 1".into())
}

fn read_survey(path: &Path) -> CliResult<Survey> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn prompt_line(prompt: &str, default: Option<&str>) -> CliResult<String> {
    if let Some(default_value) = default {
        print!("{} [{}]: ", prompt, default_value);
    } else {
        print!("{}: ", prompt);
    }
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err("unexpected end of input".into());
    }
    let trimmed = line.trim();
    match (trimmed.is_empty(), default) {
        (true, Some(default_value)) => Ok(default_value.to_string()),
        _ => Ok(trimmed.to_string()),
    }
}

fn prompt_optional(prompt: &str) -> CliResult<Option<String>> {
    let value = prompt_line(prompt, None)?;
    if value.is_empty() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

fn prompt_bool(prompt: &str, default: bool) -> CliResult<bool> {
    let prompt_text = format!("{} (y/n)", prompt.trim());
    let default_hint = if default { "Y" } else { "N" };
    loop {
        let line = prompt_line(&prompt_text, Some(default_hint))?;
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            other => {
                println!("Invalid answer '{}'. Expected yes or no.", other);
            }
        }
    }
}
