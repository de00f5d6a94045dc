//! Subcommands: dashboard, editor, public viewer and preview flows.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use folio_core::db::open_db;
use folio_core::{
    all_tags, count_by_publication, empty_state_message, filter_by_tag, public_cards, ContentCard,
    ContentId, ContentStore, CoreConfig, EditorDraft, PublicationFilter, SqliteContentRepository,
    SubmitOutcome,
};
use log::info;
use std::path::PathBuf;

/// folio - manage articles, drafts and their publication state
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite file holding content (overrides FOLIO_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides FOLIO_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides FOLIO_LOG_DIR)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check core linkage
    Ping,

    /// Dashboard: counts and content list
    List {
        /// all | published | drafts
        #[arg(short, long, default_value = "all")]
        filter: PublicationFilter,

        /// Only items carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Create new content
    New {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        excerpt: String,

        /// Markdown body
        #[arg(long, default_value = "")]
        body: String,

        /// Embeddable featured image (URL or data payload)
        #[arg(long)]
        image: Option<String>,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Publish immediately
        #[arg(long)]
        publish: bool,
    },

    /// Edit existing content
    Edit(EditArgs),

    /// Delete content
    Delete { id: ContentId },

    /// Public viewer: published content, optionally searched
    Browse {
        /// Case-insensitive match on title or excerpt
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Preview one item
    Show { id: ContentId },

    /// List tags in use
    Tags,
}

/// Changes applied by `folio edit`. Unset flags keep the stored value.
#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: ContentId,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub excerpt: Option<String>,

    #[arg(long)]
    pub body: Option<String>,

    #[arg(long, conflicts_with = "remove_image")]
    pub image: Option<String>,

    #[arg(long)]
    pub remove_image: bool,

    /// Tag to add (repeatable)
    #[arg(long = "tag")]
    pub add_tags: Vec<String>,

    /// Tag to remove (repeatable)
    #[arg(long = "untag")]
    pub remove_tags: Vec<String>,

    #[arg(long, conflicts_with = "unpublish")]
    pub publish: bool,

    #[arg(long)]
    pub unpublish: bool,
}

impl EditArgs {
    /// Whether at least one change flag was given.
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.excerpt.is_some()
            || self.body.is_some()
            || self.image.is_some()
            || self.remove_image
            || !self.add_tags.is_empty()
            || !self.remove_tags.is_empty()
            || self.publish
            || self.unpublish
    }

    fn apply_to(self, draft: &mut EditorDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(excerpt) = self.excerpt {
            draft.excerpt = excerpt;
        }
        if let Some(body) = self.body {
            draft.body = body;
        }
        if let Some(image) = self.image {
            draft.set_image(image);
        }
        if self.remove_image {
            draft.remove_image();
        }
        for tag in &self.add_tags {
            draft.add_tag(tag);
        }
        for tag in &self.remove_tags {
            draft.remove_tag(tag);
        }
        if self.publish {
            draft.published = true;
        }
        if self.unpublish {
            draft.published = false;
        }
    }
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::List { .. } => "list",
            Self::New { .. } => "new",
            Self::Edit(_) => "edit",
            Self::Delete { .. } => "delete",
            Self::Browse { .. } => "browse",
            Self::Show { .. } => "show",
            Self::Tags => "tags",
        }
    }

    pub fn execute(self, config: &CoreConfig) -> Result<()> {
        info!("event=cli_command module=cli status=start command={}", self.name());
        if let Self::Ping = self {
            println!("folio_core ping={}", folio_core::ping());
            println!("folio_core version={}", folio_core::core_version());
            return Ok(());
        }
        if let Self::Edit(args) = &self {
            if !args.has_changes() {
                bail!("nothing to edit for {}: pass at least one change flag", args.id);
            }
        }

        let mut conn = open_db(&config.db_path)
            .with_context(|| format!("failed to open {}", config.db_path.display()))?;
        let repo = SqliteContentRepository::try_new(&mut conn)?;
        let mut store = ContentStore::open(repo)?;

        match self {
            Self::Ping => Ok(()),
            Self::List { filter, tag } => list(&store, filter, tag.as_deref()),
            Self::New {
                title,
                excerpt,
                body,
                image,
                tags,
                publish,
            } => {
                let mut draft = EditorDraft::blank();
                draft.title = title;
                draft.excerpt = excerpt;
                draft.body = body;
                draft.published = publish;
                if let Some(image) = image {
                    draft.set_image(image);
                }
                for tag in &tags {
                    draft.add_tag(tag);
                }
                report(draft.submit(&mut store)?);
                Ok(())
            }
            Self::Edit(args) => {
                if store.select_content(args.id).is_none() {
                    bail!("content not found: {}", args.id);
                }
                let mut draft = EditorDraft::load(&store);
                args.apply_to(&mut draft);
                report(draft.submit(&mut store)?);
                Ok(())
            }
            Self::Delete { id } => {
                let removed = store.delete_content(id)?;
                println!("Deleted {} ({}).", removed.id, display_title(&removed.title));
                Ok(())
            }
            Self::Browse { query } => {
                let cards = public_cards(store.contents(), &query);
                if cards.is_empty() {
                    println!("No published content found.");
                }
                for card in &cards {
                    print_card(card);
                }
                Ok(())
            }
            Self::Show { id } => {
                let Some(item) = store.get_content(id) else {
                    bail!("content not found: {id}");
                };
                println!("# {}", display_title(&item.title));
                println!(
                    "status={} created_at={} updated_at={}",
                    publication_label(item.published),
                    item.created_at,
                    item.updated_at
                );
                if !item.tags.is_empty() {
                    println!("tags: {}", format_tags(&item.tags));
                }
                if !item.excerpt.is_empty() {
                    println!("\n> {}", item.excerpt);
                }
                println!("\n{}", item.content);
                Ok(())
            }
            Self::Tags => {
                for tag in all_tags(store.contents()) {
                    println!("#{tag}");
                }
                Ok(())
            }
        }
    }
}

fn list<R>(store: &ContentStore<R>, filter: PublicationFilter, tag: Option<&str>) -> Result<()>
where
    R: folio_core::ContentRepository,
{
    let counts = count_by_publication(store.contents());
    println!(
        "All ({})  Published ({})  Drafts ({})",
        counts.all, counts.published, counts.drafts
    );

    let scoped = match tag {
        Some(tag) => filter_by_tag(store.contents(), tag),
        None => store.contents().iter().collect(),
    };
    let visible = filter.apply(scoped);
    if visible.is_empty() {
        println!("No content found. {}", empty_state_message(filter));
        return Ok(());
    }
    for item in visible {
        print_card(&ContentCard::from_item(item));
    }
    Ok(())
}

fn report(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Created(id) => println!("Created {id}."),
        SubmitOutcome::Updated(id) => println!("Updated {id}."),
    }
}

fn print_card(card: &ContentCard) {
    println!(
        "{}  [{}]  {}",
        card.id,
        publication_label(card.published),
        display_title(&card.title)
    );
    if !card.summary.is_empty() {
        println!("    {}", card.summary);
    }
    if let Some(thumbnail) = card.thumbnail.as_deref() {
        println!("    image: {}", abbreviate(thumbnail, 72));
    }
    if !card.tags.is_empty() {
        println!("    tags: {}", format_tags(&card.tags));
    }
}

fn publication_label(published: bool) -> &'static str {
    if published {
        "published"
    } else {
        "draft"
    }
}

fn display_title(title: &str) -> &str {
    if title.trim().is_empty() {
        "(untitled)"
    } else {
        title
    }
}

fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// Data payloads can be megabytes long.
fn abbreviate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut short: String = value.chars().take(max_chars).collect();
    short.push_str("...");
    short
}
