use crate::config::Config;
use crate::error::ServiceError;
use crate::model::Task;

mod command;
pub use command::CommandGenerator;

/// A hosted text-generation service, reduced to one request/response call.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Used when no generator is configured. Every call fails, so callers take
/// their fallback path.
pub struct UnavailableGenerator;

impl TextGenerator for UnavailableGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::NotConfigured)
    }
}

pub fn generator_from_config(config: &Config) -> Box<dyn TextGenerator> {
    match config.generator.as_ref() {
        Some(generator) => Box::new(CommandGenerator::from_config(generator)),
        None => Box::new(UnavailableGenerator),
    }
}

pub fn title_prompt(description: &str) -> String {
    format!(
        "You are an assistant that writes very short task titles (5-10 words).\n\
         Write a single short title for this task description. \
         Do NOT include any explanation or extra text.\n\n\
         Description:\n{description}"
    )
}

pub fn plan_prompt(open_tasks: &[Task]) -> String {
    let tasks_text = if open_tasks.is_empty() {
        "No open tasks.".to_string()
    } else {
        open_tasks
            .iter()
            .map(|task| {
                format!(
                    "ID: {} | Title: {} | Priority: {} | Due: {}",
                    task.id,
                    task.display_title().replace('\n', " "),
                    task.priority.map(|priority| priority.as_str()).unwrap_or(""),
                    task.due_date.as_deref().unwrap_or(""),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are an assistant that, given a list of tasks, produces a concise \
         ordered plan for what to do today.\n\
         Given this list of tasks, produce an ordered plan for what to do today. \
         Output as a numbered list and be concise. Do not add extra commentary.\n\n\
         Tasks:\n{tasks_text}"
    )
}

#[cfg(test)]
mod tests {
    use super::{
        TextGenerator, UnavailableGenerator, generator_from_config, plan_prompt, title_prompt,
    };
    use crate::config::{Config, GeneratorConfig};
    use crate::error::ServiceError;
    use crate::model::{Priority, Task};

    #[test]
    fn unavailable_generator_reports_not_configured() {
        let err = UnavailableGenerator.generate("anything").unwrap_err();
        assert!(matches!(err, ServiceError::NotConfigured));
    }

    #[test]
    fn generator_from_config_without_generator_is_unavailable() {
        let generator = generator_from_config(&Config::default());
        assert!(matches!(
            generator.generate("plan"),
            Err(ServiceError::NotConfigured)
        ));
    }

    #[test]
    fn generator_from_config_checks_credential_before_running() {
        let config = Config {
            generator: Some(GeneratorConfig {
                command: vec!["cat".to_string()],
                credential_env: "TASKS_TEST_CREDENTIAL_NEVER_SET".to_string(),
            }),
            ..Config::default()
        };

        let err = generator_from_config(&config).generate("plan").unwrap_err();
        match err {
            ServiceError::MissingCredential(name) => {
                assert_eq!(name, "TASKS_TEST_CREDENTIAL_NEVER_SET")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn title_prompt_embeds_description() {
        let prompt = title_prompt("Clean the kitchen before Friday");
        assert!(prompt.contains("Description:\nClean the kitchen before Friday"));
    }

    #[test]
    fn plan_prompt_lists_each_task_on_one_line() {
        let mut essay = Task::new(2, "Finish CSC paper\nwith citations");
        essay.priority = Some(Priority::High);
        essay.due_date = Some("2026-10-20".to_string());
        let milk = Task::new(5, "Buy milk");

        let prompt = plan_prompt(&[essay, milk]);

        assert!(prompt.contains(
            "ID: 2 | Title: Finish CSC paper with citations | Priority: high | Due: 2026-10-20"
        ));
        assert!(prompt.contains("ID: 5 | Title: Buy milk | Priority:  | Due: "));
    }

    #[test]
    fn plan_prompt_handles_no_tasks() {
        assert!(plan_prompt(&[]).ends_with("Tasks:\nNo open tasks."));
    }
}
