pub const TITLE: &str = "Summarize Articles";
pub const PROMPT: &str = "Enter a URL";
pub const LOADING_TEXT: &str = "Summarizing...";
pub const ERROR_HEADLINE: &str = "Well, that wasn't supposed to happen...";
pub const SUMMARY_HEADING: &str = "Article Summary";
pub const COPIED_MARK: &str = "[copied]";
pub const COPY_MARK: &str = "[copy]  ";
pub const RULE: &str = "----------------------------------------";
pub const HELP_TEXT: &str = "\
Type a URL and press Enter to summarize it.
  <empty line>  resubmit the URL shown in the input
  :select N     show history entry N
  :copy N       copy the URL of history entry N
  :help         show this help
  :quit         exit";
