use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    scmport completions --shell bash > ~/.bash_completion.d/scmport\n\n\
                  Generate zsh completions:\n    scmport completions --shell zsh > ~/.zfunc/_scmport\n\n\
                  Generate fish completions:\n    scmport completions --shell fish > ~/.config/fish/completions/scmport.fish\n\n\
                  Generate PowerShell completions:\n    scmport completions --shell powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
