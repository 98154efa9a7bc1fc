//! Prompt catalogue
//!
//! One builder per request kind. Each prompt states the response shape the
//! matching extractor expects (numbered list, fenced code, JSON object, or
//! labeled fields), but the extractors never rely on the service obeying it.

use crate::types::{CodeBuffer, Language};

/// Improvement suggestions for the editor side panel
pub fn suggestions(code: &str) -> String {
    format!(
        r#"Analyze the following code and provide 1-3 concise, actionable improvement suggestions in numbered list format.
Focus on code quality, performance, and best practices. Be specific and reference line numbers where applicable.
Don't format your output, keep it in plaintext. Also, only use 5-7 words per suggestion. Only give sensible and meaningful suggestions. Give less if none are needed.
Code:
{}

Suggestions:"#,
        code
    )
}

/// Free-form chat question about the current buffer
pub fn chat(buffer: &CodeBuffer, query: &str) -> String {
    let language = buffer.language.id();
    format!(
        r#"You are CodePilot, an expert programming assistant. Format responses with:
- Code blocks using ```{language} ... ``` syntax
- Clear section separation

Current language: {language}
User's query: "{query}"
Current Code: {code}

Only respond with a code if asked. Otherwise, answer the query.
Answer only what's asked, don't explain too much unless asked. If not related to Code/Technical stuff, don't answer it.
Don't format your response except for any code blocks.

Don't make it sound like you are continuing the conversation. Treat each message as its own thing."#,
        language = language,
        query = query,
        code = buffer.content
    )
}

/// Bug, performance and complexity analysis as a JSON object
pub fn code_analysis(buffer: &CodeBuffer) -> String {
    format!(
        r#"Analyze this {language} code for issues and provide structured response:
- Identify bugs, performance issues, and security vulnerabilities
- Suggest concrete improvements
- Calculate complexity metrics

Return JSON format:
{{
  "issues": [
    {{
      "type": "bug|performance|security",
      "line": number,
      "message": string
    }}
  ],
  "performance": {{
    "score": number,
    "suggestions": string[]
  }},
  "complexity": {{
    "score": number,
    "details": string
  }}
}}

Code:
{code}

Return ONLY the JSON with no additional text."#,
        language = buffer.language.id(),
        code = buffer.content
    )
}

/// Test source generation for the buffer
pub fn test_generation(buffer: &CodeBuffer) -> String {
    format!(
        r#"As an expert QA engineer, generate comprehensive test cases for this {language} code.
Requirements:
1. Use {framework} as the testing framework
2. Include tests for: valid inputs, invalid inputs, edge cases
3. Add descriptive test names
4. Return only the test code with no explanations
5. Format properly with correct syntax

Code to test:
{code}

Test Cases:"#,
        language = buffer.language.id(),
        framework = buffer.language.test_framework(),
        code = buffer.content
    )
}

/// Predicted outcome of running a test suite, as a JSON object
pub fn test_prediction(language: Language, tests: &str) -> String {
    format!(
        r#"Analyze these {language} test cases and predict realistic results in JSON format:
{{
  "passed": number,
  "failed": number,
  "total": number,
  "coverage": "string",
  "duration": "string"
}}

Consider:
- Code complexity
- Test case quality
- Common failure patterns

Tests:
{tests}

Return ONLY the JSON with no additional text or formatting."#,
        language = language.id(),
        tests = tests
    )
}

/// Diagnosis of an error message in labeled-field format
pub fn error_diagnosis(error_message: &str) -> String {
    format!(
        r#"Analyze this programming error and provide detailed response in this format:
Error Type: [Type of error]
Likely Cause: [Possible reason for error]
Solutions:
- [Solution 1]
- [Solution 2]
- [Solution 3]

Error Message: {}

Answer only coding-related questions and don't format your response."#,
        error_message
    )
}
