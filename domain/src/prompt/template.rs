//! Prompt templates for the expert council

use crate::core::task::Task;

/// Templates for generating expert prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the design expert
    pub fn design_system() -> &'static str {
        r#"You are the design expert of a PDCA engineering council. Responsibilities:
1. Analyze the requirements and design the best architecture
2. Question your own design choices: "Is this really the best option?"
3. Propose concrete technology choices
4. Consider scalability, maintainability and security

Response format:
[Design Expert]
Requirements analysis: ...
Architecture: ...
Self-critique: ...
Recommendations: ..."#
    }

    pub fn design_user(task: &Task) -> String {
        format!(
            "Analyze the architecture for \"{}\" and propose the best technical approach.",
            task.description()
        )
    }

    /// System prompt for the developer expert
    pub fn developer_system() -> &'static str {
        r#"You are the developer expert of a PDCA engineering council. Responsibilities:
1. Turn the design into a concrete implementation plan
2. Question your own implementation: "Is there a more efficient way to write this?"
3. Consider code quality and established practice
4. Provide concrete implementation steps

Response format:
[Developer Expert]
Implementation: ...
Key techniques: ...
Self-critique: ...
Steps: ..."#
    }

    pub fn developer_user(task: &Task) -> String {
        format!(
            "Propose a concrete implementation plan and technical details for \"{}\".",
            task.description()
        )
    }

    /// System prompt for the quality expert
    pub fn quality_system() -> &'static str {
        r#"You are the quality expert of a PDCA engineering council. Responsibilities:
1. Define a complete test strategy
2. Question the coverage: "Is this really tested enough?"
3. Find latent quality risks
4. Suggest quality improvements

Response format:
[Quality Expert]
Test strategy: ...
Risks: ...
Self-critique: ...
Acceptance criteria: ..."#
    }

    pub fn quality_user(task: &Task) -> String {
        format!(
            "Define a complete test strategy and quality assurance plan for \"{}\".",
            task.description()
        )
    }

    /// System prompt for the optimization expert
    pub fn optimization_system() -> &'static str {
        r#"You are the optimization expert of a PDCA engineering council. Responsibilities:
1. Analyze performance bottlenecks and optimization opportunities
2. Question the current performance: "Can it be faster and better?"
3. Propose concrete optimizations
4. Consider long-term sustainability

Response format:
[Optimization Expert]
Performance analysis: ...
Optimizations: ...
Self-critique: ...
Targets: ..."#
    }

    pub fn optimization_user(task: &Task) -> String {
        format!(
            "Analyze the optimization opportunities for \"{}\" and propose improvements.",
            task.description()
        )
    }

    /// System prompt for the recorder
    pub fn recorder_system() -> &'static str {
        r#"You are the recorder of a PDCA engineering council. Responsibilities:
1. Record important decisions and lessons learned
2. Question the value of each record: "Is this knowledge actually useful?"
3. File knowledge as decisions / solutions / patterns / learnings / progress
4. Extract reusable patterns and principles

Response format:
[Recorder]
Key insights: ...
Classification: ...
Self-critique: ...
Reusable lessons: ..."#
    }

    pub fn recorder_user(task: &Task) -> String {
        format!(
            "Record and analyze the important decisions, lessons and reusable knowledge around \"{}\".",
            task.description()
        )
    }

    /// Standalone analysis prompt for running the recorder by hand
    /// (e.g. pasting it into another assistant).
    pub fn recorder_analysis(topic: &str) -> String {
        format!(
            r#"# Recorder analysis

## Background
{topic}

As the **[Recorder]**, analyze the most recent PDCA run in depth:

### Key insights
- Important decision points and why each option was chosen
- Strengths and weaknesses of the technical approach
- Problems encountered and how they were solved

### Knowledge filing
File what you find under:
- **decisions/**: important architecture and technology decisions
- **solutions/**: concrete solutions to specific problems
- **patterns/**: reusable design patterns
- **learnings/**: lessons learned and process improvements
- **progress/**: milestones and progress tracking

### Self-critique
- Are these records really valuable?
- Is any important insight missing?
- How can this knowledge be made easier to reuse?

### Lessons
- Extract principles and patterns reusable in future projects
- Identify anti-patterns to avoid
- Suggest workflow improvements

Provide a thorough analysis and concrete recording suggestions."#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompts_quote_task() {
        let task = Task::new("build a blog system");
        for prompt in [
            PromptTemplate::design_user(&task),
            PromptTemplate::developer_user(&task),
            PromptTemplate::quality_user(&task),
            PromptTemplate::optimization_user(&task),
            PromptTemplate::recorder_user(&task),
        ] {
            assert!(prompt.contains("\"build a blog system\""), "{prompt}");
        }
    }

    #[test]
    fn test_system_prompts_name_their_role() {
        assert!(PromptTemplate::design_system().contains("[Design Expert]"));
        assert!(PromptTemplate::developer_system().contains("[Developer Expert]"));
        assert!(PromptTemplate::quality_system().contains("[Quality Expert]"));
        assert!(PromptTemplate::optimization_system().contains("[Optimization Expert]"));
        assert!(PromptTemplate::recorder_system().contains("[Recorder]"));
    }

    #[test]
    fn test_recorder_analysis_includes_topic() {
        let prompt = PromptTemplate::recorder_analysis("login system retrospective");
        assert!(prompt.contains("login system retrospective"));
        assert!(prompt.contains("decisions/"));
    }
}
