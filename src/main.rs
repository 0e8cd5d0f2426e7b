use clap::{Parser, Subcommand};
use serde_json::Value;

use mailchimp_audience::{
    AudienceClient, ClientConfig, InterestSpec, InterestsInput, MemberStatus, MergeFields,
};

#[derive(Parser, Debug)]
#[command(
    name = "mailchimp-audience",
    about = "Manage members, interests and tags of a Mailchimp audience"
)]
struct Args {
    /// Audience (list) id to operate on.
    #[arg(long, env = "MAILCHIMP_LIST_ID")]
    list_id: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Subscribe an address, creating the member if needed.
    Subscribe {
        email: String,
        /// `Category:Interest,...` or a JSON object of category title to interest name(s).
        #[arg(long, value_parser = parse_interests)]
        interests: Option<InterestSpec>,
        /// Merge field as `TAG=value`; repeatable.
        #[arg(long = "merge", value_parser = parse_merge_field)]
        merge: Vec<(String, String)>,
    },
    /// Unsubscribe an address.
    Unsubscribe { email: String },
    /// Upsert a member, leaving the status of existing members alone unless `--status` is given.
    Update {
        email: String,
        #[arg(long, value_parser = parse_interests)]
        interests: Option<InterestSpec>,
        #[arg(long = "merge", value_parser = parse_merge_field)]
        merge: Vec<(String, String)>,
        /// One of subscribed, unsubscribed, cleaned, pending, transactional.
        #[arg(long)]
        status: Option<MemberStatus>,
    },
    /// Show a member record.
    Member { email: String },
    /// List interests, or resolve interest names to ids.
    Interests {
        /// Only list the interests of this category.
        #[arg(long, conflicts_with = "names")]
        category: Option<String>,
        /// Comma-separated interest names to resolve across all categories.
        #[arg(long)]
        names: Option<String>,
    },
    /// Inspect or change tag membership.
    Tags {
        #[command(subcommand)]
        action: TagsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TagsCommand {
    /// Print the tags on a member.
    List { email: String },
    /// Add a member to tags.
    Add {
        email: String,
        #[arg(required = true)]
        tags: Vec<String>,
        /// Create tags that do not exist yet.
        #[arg(long)]
        create: bool,
    },
    /// Remove a member from tags.
    Remove {
        email: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

fn parse_interests(raw: &str) -> Result<InterestSpec, String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
        serde_json::from_str(trimmed).map_err(|err| format!("invalid interests JSON: {err}"))
    } else {
        Ok(InterestSpec::from(trimmed))
    }
}

fn parse_merge_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected TAG=value, got '{raw}'")),
    }
}

fn merge_fields(pairs: Vec<(String, String)>) -> Option<MergeFields> {
    (!pairs.is_empty()).then(|| pairs.into_iter().collect())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    mailchimp_audience::init_logger();

    let args = Args::parse();
    let config = ClientConfig::from_env()?;
    let client = AudienceClient::from_config(&config)?;
    let list_id = args.list_id.as_str();

    let output: Value = match args.command {
        Command::Subscribe {
            email,
            interests,
            merge,
        } => serde_json::to_value(
            client
                .subscribe(
                    list_id,
                    &email,
                    interests.map(InterestsInput::Spec),
                    merge_fields(merge),
                )
                .await?,
        )?,
        Command::Unsubscribe { email } => {
            serde_json::to_value(client.unsubscribe(list_id, &email).await?)?
        }
        Command::Update {
            email,
            interests,
            merge,
            status,
        } => serde_json::to_value(
            client
                .update_user(
                    list_id,
                    &email,
                    interests.map(InterestsInput::Spec),
                    merge_fields(merge),
                    status,
                )
                .await?,
        )?,
        Command::Member { email } => {
            serde_json::to_value(client.get_member(list_id, &email).await?)?
        }
        Command::Interests { category, names } => match (category, names) {
            (Some(category_id), _) => serde_json::to_value(
                client
                    .list_interests_by_category(list_id, &category_id)
                    .await?,
            )?,
            (None, Some(names)) => {
                serde_json::to_value(client.resolve_interest_names(list_id, &names).await?)?
            }
            (None, None) => {
                serde_json::to_value(client.list_all_interests(list_id).await?.as_slice())?
            }
        },
        Command::Tags { action } => match action {
            TagsCommand::List { email } => {
                serde_json::to_value(client.get_tags_by_user(list_id, &email).await?)?
            }
            TagsCommand::Add {
                email,
                tags,
                create,
            } => serde_json::to_value(
                client
                    .assign_tags_to_user(list_id, &email, tags.as_slice(), create)
                    .await?,
            )?,
            TagsCommand::Remove { email, tags } => {
                serde_json::to_value(client.remove_tags(list_id, &email, tags.as_slice()).await?)?
            }
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
