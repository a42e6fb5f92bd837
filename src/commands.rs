//! Command execution.
//!
//! Each command returns the text to print. Engine errors bubble up as
//! `anyhow` errors; storage and guidance problems are handled by
//! [`Session`] and the guidance service and never fail a command.

use anyhow::{Context, bail};
use hunter_config::GuidanceConfig;
use hunter_config::auth::resolve_api_key_from_env;
use hunter_guidance::{GuidancePrompt, GuidanceService};
use hunter_protocol::{Notification, PlayerStats};

use crate::assistant::build_service;
use crate::cli::{Commands, SubtaskCommands};
use crate::render;
use crate::session::{Session, resolve_objective};

/// A session plus the settings needed to ask for guidance.
#[derive(Debug)]
pub struct App {
    session: Session,
    guidance: GuidanceConfig,
}

impl App {
    #[must_use]
    pub fn new(session: Session, guidance: GuidanceConfig) -> Self {
        Self { session, guidance }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn guidance_service(&self) -> anyhow::Result<GuidanceService> {
        let api_key = resolve_api_key_from_env(self.guidance.api_key.as_deref());
        build_service(&self.guidance, api_key)
    }

    /// Runs `command` and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an error if a task reference cannot be resolved or the
    /// engine rejects the operation.
    pub async fn execute(&self, command: Commands) -> anyhow::Result<String> {
        match command {
            Commands::Add {
                title,
                rank,
                category,
                description,
            } => {
                let task = self.session.mutate(|engine| {
                    engine.register_task(&title, &description, rank, &category)
                })?;
                Ok(format!(
                    "{}\n  {}",
                    render::notification(&Notification::TaskRegistered {
                        title: task.title.clone()
                    }),
                    render::task_line(&task)
                ))
            }

            Commands::List { all } => Ok(render::task_list(&self.session.snapshot(), all)),

            Commands::Show { task } => {
                let id = self.session.resolve_task(&task)?;
                let engine = self.session.snapshot();
                let task = engine.task(id).context("dungeon vanished")?;
                Ok(render::task_detail(task))
            }

            Commands::Complete { task } => {
                let id = self.session.resolve_task(&task)?;
                let completion = self.session.mutate(|engine| engine.complete_task(id))?;
                Ok(match completion.notification() {
                    Some(note) => render::notification(&note),
                    None => format!("\"{}\" is already cleared.", completion.task.title),
                })
            }

            Commands::Reopen { task } => {
                let id = self.session.resolve_task(&task)?;
                let was_cleared = self
                    .session
                    .engine()
                    .with(|engine| engine.task(id).is_some_and(|t| t.completed));
                let task = self.session.mutate(|engine| engine.uncomplete_task(id))?;
                Ok(if was_cleared {
                    render::notification(&Notification::DungeonReopened { title: task.title })
                } else {
                    format!("\"{}\" is not cleared.", task.title)
                })
            }

            Commands::Progress { task, value } => {
                let id = self.session.resolve_task(&task)?;
                let task = self
                    .session
                    .mutate(|engine| engine.set_progress(id, value))?;
                Ok(render::notification(&Notification::ProgressUpdated {
                    progress: render::percent(task.progress),
                }))
            }

            Commands::Subtask { action } => self.subtask(action),

            Commands::Log { task, minutes } => {
                let id = self.session.resolve_task(&task)?;
                let task = self.session.mutate(|engine| engine.log_time(id, minutes))?;
                Ok(format!(
                    "{}\n  {} / {} min",
                    render::notification(&Notification::TimeLogged { minutes }),
                    task.time_spent_minutes,
                    task.estimated_minutes
                ))
            }

            Commands::Delete { task } => {
                let id = self.session.resolve_task(&task)?;
                self.session.mutate(|engine| engine.delete_task(id))?;
                Ok(render::notification(&Notification::DungeonRemoved))
            }

            Commands::Stats { json } => {
                let stats = PlayerStats::compute(&self.session.snapshot());
                if json {
                    serde_json::to_string_pretty(&stats).context("cannot encode stats")
                } else {
                    Ok(render::stats(&stats))
                }
            }

            Commands::Motivate { task } => {
                let prompt = match task {
                    Some(query) => {
                        let id = self.session.resolve_task(&query)?;
                        let title = self
                            .session
                            .engine()
                            .with(|engine| engine.task(id).map(|t| t.title.clone()))
                            .context("dungeon vanished")?;
                        GuidancePrompt::motivation_for(title)
                    }
                    None => GuidancePrompt::Motivation { task_title: None },
                };
                self.ask_guidance(prompt).await
            }

            Commands::Ask { message, raw } => {
                let message = message.join(" ");
                if message.trim().is_empty() {
                    bail!("nothing to ask");
                }
                let prompt = if raw {
                    GuidancePrompt::Raw(message)
                } else {
                    GuidancePrompt::Question(message)
                };
                self.ask_guidance(prompt).await
            }

            Commands::Whoami => Ok(self.whoami()),

            Commands::Reset { yes } => {
                if !yes {
                    bail!("this erases every dungeon and all XP, run again with --yes to confirm");
                }
                self.session.reset().context("failed to reset profile")?;
                Ok("Profile reset. A fresh hunter awakens.".to_string())
            }
        }
    }

    fn subtask(&self, action: SubtaskCommands) -> anyhow::Result<String> {
        match action {
            SubtaskCommands::Add { task, title } => {
                let id = self.session.resolve_task(&task)?;
                let task = self
                    .session
                    .mutate(|engine| engine.add_subtask(id, &title))?;
                let added = task.subtasks.last().map(|s| s.title.clone()).unwrap_or(title);
                Ok(format!(
                    "{}\n  {}",
                    render::notification(&Notification::ObjectiveAdded { title: added }),
                    render::task_line(&task)
                ))
            }
            SubtaskCommands::Toggle { task, objective } => {
                let id = self.session.resolve_task(&task)?;
                let engine = self.session.snapshot();
                let current = engine.task(id).context("dungeon vanished")?;
                let subtask_id = resolve_objective(current, &objective)?;

                let task = self
                    .session
                    .mutate(|engine| engine.toggle_subtask(id, subtask_id))?;
                let toggled = task
                    .subtask(subtask_id)
                    .context("objective vanished")?;
                Ok(format!(
                    "{}\n  {}",
                    render::notification(&Notification::ObjectiveToggled {
                        title: toggled.title.clone(),
                        completed: toggled.completed,
                    }),
                    render::task_line(&task)
                ))
            }
        }
    }

    async fn ask_guidance(&self, prompt: GuidancePrompt) -> anyhow::Result<String> {
        let service = self.guidance_service()?;
        let guidance = service.request(prompt).await;
        if let Some(reason) = &guidance.failure {
            tracing::warn!(%reason, provider = service.provider_name(), "guidance fell back to canned text");
        }
        Ok(render::guidance(&guidance))
    }

    fn whoami(&self) -> String {
        let user = self
            .session
            .user_id()
            .unwrap_or_else(|| "(unsaved session)".to_string());
        let storage = match self.session.location() {
            Some(path) => path.display().to_string(),
            None if self.session.is_persistent() => "(custom store)".to_string(),
            None => "(memory only)".to_string(),
        };
        format!(
            "hunter:   {user}\nstorage:  {storage}\nguidance: {}",
            self.guidance.backend
        )
    }
}
