// Tailoring: prompt construction, the external generation runner, and the
// marker-based split of its output into résumé and cover letter.

pub mod client;
pub mod handlers;
pub mod parser;
pub mod prompts;
