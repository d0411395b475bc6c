//! Command-line arguments and the intent scripts they expand to.
//!
//! Every subcommand except `audio` becomes a list of [`Intent`]s, replayed
//! in order by the console driver. Flows that act on behalf of a user are
//! prefixed with a sign-in when credentials are given.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use cipherlab_app::{AppConfig, Attachment, Intent, Page, views::Panel};
use cipherlab_client::{ClientConfig, DEFAULT_BASE_URL};
use cipherlab_proto::{
    Algorithm, AttackMethod, CipherAttackKind, KeyParams, MessageId, ShiftDirection, UserId,
    requests::Credentials,
};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;

/// Errors raised while turning arguments into a flow.
#[derive(Debug, Error)]
pub enum CliError {
    /// The subcommand needs an account.
    #[error("--username and --password are required for {0}")]
    MissingCredentials(&'static str),

    /// A local input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Cipherlab command-line client
#[derive(Parser, Debug, Clone)]
#[command(name = "cipherlab")]
#[command(about = "Replay cipherlab user flows against a server and print the resulting page")]
#[command(version)]
pub struct Cli {
    /// Server root URL
    #[arg(long, env = "CIPHERLAB_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Account used to sign in before flows that need a session
    #[arg(long, env = "CIPHERLAB_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for --username
    #[arg(long, env = "CIPHERLAB_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Write the final page to this file instead of stdout
    #[arg(long, global = true)]
    pub html: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Whole-request timeout in seconds
    #[arg(long, default_value_t = 300, global = true)]
    pub timeout_secs: u64,

    /// Reload conversations every N seconds
    #[arg(long, global = true)]
    pub poll_secs: Option<u64>,

    /// Flow to run
    #[command(subcommand)]
    pub command: Command,
}

/// User flows.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Register the --username/--password account
    Signup,

    /// Sign in with --username/--password
    Signin,

    /// Recover a registered user's password
    AttackUser {
        /// Login to attack
        #[arg(long)]
        target: String,
        /// bruteforce, dictionary3 or dictionary5
        #[arg(long)]
        method: AttackMethod,
    },

    /// Run a cipher attack on a ciphertext
    Crack {
        /// caesar, playfair_dict, hill_brute or hill_dict
        #[arg(long)]
        kind: CipherAttackKind,
        /// Ciphertext to attack
        #[arg(long)]
        ciphertext: String,
        /// Panel to submit from; defaults to the one offering --kind
        #[arg(long)]
        tab: Option<Panel>,
    },

    /// Encrypt a message on the workbench
    Encrypt {
        /// Cipher and key
        #[command(flatten)]
        cipher: CipherArgs,
        /// Plaintext
        #[arg(long)]
        message: String,
    },

    /// Decrypt a message on the workbench
    Decrypt {
        /// Cipher and key
        #[command(flatten)]
        cipher: CipherArgs,
        /// Ciphertext
        #[arg(long)]
        ciphertext: String,
    },

    /// List registered users
    Users {
        /// Leave this user out
        #[arg(long)]
        except: Option<UserId>,
    },

    /// Show the conversation with a user
    Conversation {
        /// Peer user id
        #[arg(long = "with")]
        peer: UserId,
        /// Decrypt this received text message (repeatable)
        #[arg(long)]
        decrypt: Vec<MessageId>,
        /// Extract the text hidden in this received audio message (repeatable)
        #[arg(long)]
        extract: Vec<MessageId>,
    },

    /// Send an encrypted text message
    Send {
        /// Recipient user id
        #[arg(long)]
        to: UserId,
        /// Cipher and key
        #[command(flatten)]
        cipher: CipherArgs,
        /// Plaintext; the server encrypts it
        #[arg(long)]
        message: String,
    },

    /// Hide a message in a WAV file and send it
    StegoSend {
        /// Recipient user id
        #[arg(long)]
        to: UserId,
        /// Carrier WAV file
        #[arg(long)]
        file: PathBuf,
        /// Text to hide
        #[arg(long)]
        secret: String,
    },

    /// Download a stored audio message
    Audio {
        /// Stored file name, as listed in the conversation
        #[arg(long)]
        file: String,
        /// Destination path
        #[arg(long)]
        out: PathBuf,
    },
}

/// Cipher selection shared by the text subcommands.
#[derive(Args, Debug, Clone)]
pub struct CipherArgs {
    /// caesar, playfair or hill
    #[arg(long)]
    pub algorithm: Algorithm,
    /// Caesar shift, 1 to 25
    #[arg(long, conflicts_with = "key", value_parser = clap::value_parser!(u8).range(1..=25))]
    pub shift: Option<u8>,
    /// Caesar direction: droite or gauche
    #[arg(long, requires = "shift")]
    pub direction: Option<ShiftDirection>,
    /// Playfair or Hill key
    #[arg(long)]
    pub key: Option<String>,
}

impl CipherArgs {
    /// Key params to send; the server defaults when none were given.
    pub fn key_params(&self) -> KeyParams {
        match (&self.shift, &self.key) {
            (Some(shift), _) => {
                KeyParams::Shift { shift: *shift, direction: self.direction.unwrap_or_default() }
            },
            (None, Some(key)) => KeyParams::Keyword { key: key.clone() },
            (None, None) => KeyParams::default_for(self.algorithm),
        }
    }
}

/// What a command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Replay intents through the app.
    Replay {
        /// Intents, in order.
        steps: Vec<Intent>,
        /// Page whose last frame is the output even if the app moves on
        /// by itself afterwards.
        keep: Option<Page>,
    },
    /// Fetch a stored audio file.
    Download {
        /// Stored file name.
        file: String,
        /// Destination.
        out: PathBuf,
    },
}

impl Cli {
    /// HTTP client settings.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientConfig::default()
        }
    }

    /// View timing, with polling when requested.
    pub fn app_config(&self) -> AppConfig {
        AppConfig { poll_interval: self.poll_secs.map(Duration::from_secs), ..AppConfig::default() }
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                Some(Credentials { username: username.clone(), password: password.clone() })
            },
            _ => None,
        }
    }

    fn required_credentials(&self, flow: &'static str) -> Result<Credentials, CliError> {
        self.credentials().ok_or(CliError::MissingCredentials(flow))
    }

    /// Expand the subcommand.
    ///
    /// # Errors
    ///
    /// Fails if an account is required but not given, or the carrier file
    /// of `stego-send` cannot be read.
    pub fn flow(&self) -> Result<Flow, CliError> {
        let mut keep = None;
        let steps = match &self.command {
            Command::Signup => {
                vec![Intent::Navigate(Page::Auth), Intent::SignUp(self.required_credentials("signup")?)]
            },
            Command::Signin => {
                vec![Intent::Navigate(Page::Auth), Intent::SignIn(self.required_credentials("signin")?)]
            },
            Command::AttackUser { target, method } => {
                // The session redirects home after its auto-login.
                keep = Some(Page::Attack);
                vec![
                    Intent::Navigate(Page::Attack),
                    Intent::SelectMethod(*method),
                    Intent::StartAttack { username: target.clone() },
                ]
            },
            Command::Crack { kind, ciphertext, tab } => {
                let panel = tab.unwrap_or_else(|| Panel::for_kind(*kind));
                vec![
                    Intent::Navigate(Page::Crack),
                    Intent::SelectPanel(panel),
                    Intent::Crack { panel, kind: *kind, ciphertext: ciphertext.clone() },
                ]
            },
            Command::Encrypt { cipher, message } => vec![
                Intent::Navigate(Page::Workbench),
                Intent::Encrypt {
                    message: message.clone(),
                    algorithm: cipher.algorithm,
                    key_params: cipher.key_params(),
                },
            ],
            Command::Decrypt { cipher, ciphertext } => vec![
                Intent::Navigate(Page::Workbench),
                Intent::Decrypt {
                    ciphertext: ciphertext.clone(),
                    algorithm: cipher.algorithm,
                    key_params: cipher.key_params(),
                },
            ],
            Command::Users { except } => vec![Intent::Navigate(Page::Directory { except: *except })],
            Command::Conversation { peer, decrypt, extract } => {
                let mut steps = self.signed_in();
                steps.push(Intent::Navigate(Page::Conversation { peer: *peer }));
                steps.extend(decrypt.iter().copied().map(Intent::DecryptMessage));
                steps.extend(extract.iter().copied().map(Intent::ExtractMessage));
                steps
            },
            Command::Send { to, cipher, message } => {
                let mut steps = self.signed_in();
                steps.push(Intent::Navigate(Page::Conversation { peer: *to }));
                steps.push(Intent::SendCrypto {
                    message: message.clone(),
                    algorithm: cipher.algorithm,
                    key_params: cipher.key_params(),
                });
                steps
            },
            Command::StegoSend { to, file, secret } => {
                let attachment = read_attachment(file)?;
                let mut steps = self.signed_in();
                steps.push(Intent::Navigate(Page::Conversation { peer: *to }));
                steps.push(Intent::SendStego { secret: secret.clone(), attachment: Some(attachment) });
                steps
            },
            Command::Audio { file, out } => {
                return Ok(Flow::Download { file: file.clone(), out: out.clone() });
            },
        };
        Ok(Flow::Replay { steps, keep })
    }

    /// Sign-in prefix when credentials are available.
    fn signed_in(&self) -> Vec<Intent> {
        self.credentials()
            .map(|credentials| vec![Intent::Navigate(Page::Auth), Intent::SignIn(credentials)])
            .unwrap_or_default()
    }
}

fn read_attachment(path: &Path) -> Result<Attachment, CliError> {
    let bytes =
        std::fs::read(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    let mime = if file_name.to_ascii_lowercase().ends_with(".wav") {
        "audio/wav"
    } else {
        "application/octet-stream"
    };
    Ok(Attachment { file_name, mime: mime.to_string(), bytes })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cipherlab").chain(args.iter().copied())).unwrap()
    }

    fn replay(cli: &Cli) -> Vec<Intent> {
        match cli.flow().unwrap() {
            Flow::Replay { steps, .. } => steps,
            Flow::Download { .. } => panic!("expected a replayed flow"),
        }
    }

    #[test]
    fn attack_user_script() {
        let cli = parse(&["attack-user", "--target", "alice", "--method", "dictionary3"]);
        assert_eq!(
            cli.flow().unwrap(),
            Flow::Replay {
                steps: vec![
                    Intent::Navigate(Page::Attack),
                    Intent::SelectMethod(AttackMethod::Dictionary3),
                    Intent::StartAttack { username: "alice".into() },
                ],
                keep: Some(Page::Attack),
            }
        );
    }

    #[test]
    fn crack_panel_follows_kind() {
        let cli = parse(&["crack", "--kind", "playfair_dict", "--ciphertext", "BMODZ"]);
        let steps = replay(&cli);
        assert_eq!(steps[1], Intent::SelectPanel(Panel::Dictionary));

        let cli = parse(&["crack", "--kind", "caesar", "--ciphertext", "KHOOR", "--tab", "brute-force"]);
        assert_eq!(replay(&cli)[1], Intent::SelectPanel(Panel::BruteForce));
    }

    #[test]
    fn key_params_from_flags() {
        let cli = parse(&["encrypt", "--algorithm", "caesar", "--shift", "5", "--direction", "gauche", "--message", "hi"]);
        let Intent::Encrypt { key_params, .. } = &replay(&cli)[1] else { panic!("expected encrypt") };
        assert_eq!(*key_params, KeyParams::Shift { shift: 5, direction: ShiftDirection::Left });

        let cli = parse(&["decrypt", "--algorithm", "hill", "--ciphertext", "XY"]);
        let Intent::Decrypt { key_params, .. } = &replay(&cli)[1] else { panic!("expected decrypt") };
        assert_eq!(*key_params, KeyParams::Keyword { key: "FRID".into() });
    }

    #[test]
    fn shift_out_of_range_is_rejected() {
        let args = ["cipherlab", "encrypt", "--algorithm", "caesar", "--shift", "26", "--message", "hi"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn conversation_signs_in_first_when_credentials_given() {
        let cli = parse(&[
            "--username", "alice", "--password", "234",
            "conversation", "--with", "2", "--decrypt", "10", "--decrypt", "11", "--extract", "12",
        ]);
        let steps = replay(&cli);

        assert_eq!(steps[0], Intent::Navigate(Page::Auth));
        assert!(matches!(&steps[1], Intent::SignIn(c) if c.username == "alice"));
        assert_eq!(
            &steps[2..],
            &[
                Intent::Navigate(Page::Conversation { peer: 2 }),
                Intent::DecryptMessage(10),
                Intent::DecryptMessage(11),
                Intent::ExtractMessage(12),
            ]
        );
    }

    #[test]
    fn only_attack_keeps_its_page() {
        for args in [&["users"][..], &["signin", "--username", "a", "--password", "b"][..]] {
            let Flow::Replay { keep, .. } = parse(args).flow().unwrap() else { panic!("expected replay") };
            assert_eq!(keep, None);
        }
    }

    #[test]
    fn signup_requires_credentials() {
        let cli = parse(&["signup"]);
        assert!(matches!(cli.flow(), Err(CliError::MissingCredentials("signup"))));
    }

    #[test]
    fn stego_send_reads_carrier() {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(b"RIFF....WAVE").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["stego-send", "--to", "3", "--file", &path, "--secret", "noon"]);
        let steps = replay(&cli);
        let Intent::SendStego { attachment: Some(attachment), secret } = &steps[1] else {
            panic!("expected stego send");
        };
        assert_eq!(secret, "noon");
        assert_eq!(attachment.mime, "audio/wav");
        assert_eq!(attachment.bytes, b"RIFF....WAVE");
    }

    #[test]
    fn audio_is_a_download() {
        let cli = parse(&["audio", "--file", "stego_1.wav", "--out", "out.wav"]);
        assert_eq!(
            cli.flow().unwrap(),
            Flow::Download { file: "stego_1.wav".into(), out: PathBuf::from("out.wav") }
        );
    }
}
