//! Interactive line-oriented front end for a catalog session.

use std::io::{BufRead, Write};

use anyhow::Result;
use serde::Serialize;
use vitrina_core::session::{CatalogIntent, CatalogSession, DispatchOutcome, Notice};
use vitrina_core::view::DisplayState;
use vitrina_core::ProductId;

use crate::presenter::render_text;

pub const HELP_TEXT: &str = "\
Commands:
  add                                   add a random predefined product
  add <name> | <price> | <description>  fill the form and submit it
  set <name|price|description> <value>  edit one form field
  form                                  show the form fields
  submit                                add a product from the form
  delete <id>                           delete a product
  reset                                 restore the default catalog
  list                                  show the catalog
  help                                  show this help
  quit                                  leave the shell";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Price,
    Description,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    AddPredefined,
    AddCustom { name: String, price: String, description: String },
    Set { field: FormField, value: String },
    ShowForm,
    Submit,
    Delete(ProductId),
    Reset,
    List,
    Help,
    Quit,
    Invalid { message: String },
    Unknown { verb: String },
}

pub fn parse_shell_command(input: &str) -> ShellCommand {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return ShellCommand::Help;
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb.to_ascii_lowercase(), rest.trim()),
        None => (trimmed.to_ascii_lowercase(), ""),
    };

    match verb.as_str() {
        "add" | "new" if rest.is_empty() => ShellCommand::AddPredefined,
        "add" | "new" => {
            let mut fields = rest.splitn(3, '|').map(str::to_string);
            ShellCommand::AddCustom {
                name: fields.next().unwrap_or_default(),
                price: fields.next().unwrap_or_default(),
                description: fields.next().unwrap_or_default(),
            }
        }
        "set" => parse_set(rest),
        "form" => ShellCommand::ShowForm,
        "submit" => ShellCommand::Submit,
        "delete" | "del" | "rm" => match rest.parse::<ProductId>() {
            Ok(id) => ShellCommand::Delete(id),
            Err(_) => ShellCommand::Invalid { message: "usage: delete <id>".to_string() },
        },
        "reset" => ShellCommand::Reset,
        "list" | "ls" => ShellCommand::List,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        _ => ShellCommand::Unknown { verb },
    }
}

fn parse_set(rest: &str) -> ShellCommand {
    let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let field = match field.to_ascii_lowercase().as_str() {
        "name" => FormField::Name,
        "price" => FormField::Price,
        "description" | "desc" => FormField::Description,
        _ => {
            return ShellCommand::Invalid {
                message: "usage: set <name|price|description> <value>".to_string(),
            }
        }
    };
    ShellCommand::Set { field, value: value.trim().to_string() }
}

/// Custom-product form fields. Cleared only after a successful submit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub description: String,
}

impl ProductForm {
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Price => self.price = value,
            FormField::Description => self.description = value,
        }
    }

    pub fn intent(&self) -> CatalogIntent {
        CatalogIntent::AddCustom {
            name: self.name.clone(),
            price: self.price.clone(),
            description: self.description.clone(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Serialize)]
struct ShellResponse<'a> {
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<&'a Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    form: Option<&'a ProductForm>,
    display: &'a DisplayState,
}

pub struct Shell<W> {
    session: CatalogSession,
    form: ProductForm,
    output: W,
    format: OutputFormat,
}

impl<W: Write> Shell<W> {
    pub fn new(session: CatalogSession, output: W, format: OutputFormat) -> Self {
        Self { session, form: ProductForm::default(), output, format }
    }

    /// Reads commands until `quit` or end of input. Every response ends with
    /// the current display state.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.output, "Type `help` for the list of commands.")?;
        }
        self.show_display("list")?;

        for line in input.lines() {
            let line = line?;
            if !self.handle(parse_shell_command(&line))? {
                break;
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Applies one command. Returns `false` when the shell should stop.
    pub fn handle(&mut self, command: ShellCommand) -> Result<bool> {
        match command {
            ShellCommand::AddPredefined => {
                let outcome = self.session.dispatch(CatalogIntent::AddPredefined);
                self.show_outcome("add", &outcome)?;
            }
            ShellCommand::AddCustom { name, price, description } => {
                self.form = ProductForm {
                    name: name.trim().to_string(),
                    price: price.trim().to_string(),
                    description: description.trim().to_string(),
                };
                self.submit_form()?;
            }
            ShellCommand::Set { field, value } => {
                self.form.set(field, value);
                self.show_form()?;
            }
            ShellCommand::ShowForm => self.show_form()?,
            ShellCommand::Submit => self.submit_form()?,
            ShellCommand::Delete(product_id) => {
                let outcome = self.session.dispatch(CatalogIntent::Delete(product_id));
                self.show_outcome("delete", &outcome)?;
            }
            ShellCommand::Reset => {
                let outcome = self.session.dispatch(CatalogIntent::Reset);
                self.show_outcome("reset", &outcome)?;
            }
            ShellCommand::List => self.show_display("list")?,
            ShellCommand::Help => self.show_message("help", HELP_TEXT)?,
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Invalid { message } => self.show_message("invalid", &message)?,
            ShellCommand::Unknown { verb } => {
                let message = format!("unknown command `{verb}`; type `help` for usage");
                self.show_message("unknown", &message)?;
            }
        }
        Ok(true)
    }

    pub fn session(&self) -> &CatalogSession {
        &self.session
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn submit_form(&mut self) -> Result<()> {
        let outcome = self.session.dispatch(self.form.intent());
        if outcome.changed {
            self.form.clear();
        }
        self.show_outcome("submit", &outcome)
    }

    fn show_outcome(&mut self, command: &str, outcome: &DispatchOutcome) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                let prefix = if outcome.notice.is_rejection() { "error: " } else { "" };
                writeln!(self.output, "{prefix}{}", outcome.notice)?;
                writeln!(self.output, "{}", render_text(&outcome.display))?;
                Ok(())
            }
            OutputFormat::Json => write_json(
                &mut self.output,
                &ShellResponse {
                    command,
                    notice: Some(&outcome.notice),
                    message: None,
                    form: None,
                    display: &outcome.display,
                },
            ),
        }
    }

    fn show_display(&mut self, command: &str) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                let text = render_text(self.session.display());
                writeln!(self.output, "{text}")?;
                Ok(())
            }
            OutputFormat::Json => write_json(
                &mut self.output,
                &ShellResponse {
                    command,
                    notice: None,
                    message: None,
                    form: None,
                    display: self.session.display(),
                },
            ),
        }
    }

    fn show_form(&mut self) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.output, "name: {}", self.form.name)?;
                writeln!(self.output, "price: {}", self.form.price)?;
                writeln!(self.output, "description: {}", self.form.description)?;
                writeln!(self.output, "{}", render_text(self.session.display()))?;
                Ok(())
            }
            OutputFormat::Json => write_json(
                &mut self.output,
                &ShellResponse {
                    command: "form",
                    notice: None,
                    message: None,
                    form: Some(&self.form),
                    display: self.session.display(),
                },
            ),
        }
    }

    fn show_message(&mut self, command: &str, message: &str) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.output, "{message}")?;
                writeln!(self.output, "{}", render_text(self.session.display()))?;
                Ok(())
            }
            OutputFormat::Json => write_json(
                &mut self.output,
                &ShellResponse {
                    command,
                    notice: None,
                    message: Some(message),
                    form: None,
                    display: self.session.display(),
                },
            ),
        }
    }
}

fn write_json<W: Write>(output: &mut W, payload: &ShellResponse<'_>) -> Result<()> {
    let line = serde_json::to_string(payload)?;
    writeln!(output, "{line}")?;
    Ok(())
}
