//! `boxdline film|filmography|profile|url` - single-page lookups

use anyhow::Result;
use boxdline_letterboxd::{Client, FilmographyOpts, Profession};
use clap::Args;

use super::{print_films, write_json_line};

#[derive(Args, Debug)]
pub struct FilmArgs {
    /// Film slug, as in /film/SLUG/
    pub slug: String,
}

#[derive(Args, Debug)]
pub struct FilmographyArgs {
    /// actor, director, producer, or writer
    pub profession: Profession,

    /// Person slug, as in /PROFESSION/PERSON/
    pub person: String,
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Letterboxd username
    pub user: String,
}

#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Letterboxd URL or site-relative path
    pub url: String,
}

pub async fn film(args: FilmArgs, client: &Client) -> Result<()> {
    let film = client.film(&args.slug).await?;
    write_json_line(&mut std::io::stdout().lock(), &film)
}

pub async fn filmography(args: FilmographyArgs, client: &Client) -> Result<()> {
    let opts = FilmographyOpts {
        person: args.person,
        profession: args.profession,
    };
    let films = client.filmography(&opts).await?;
    log::info!("{} films for {}", films.len(), opts.person);
    print_films(&films)
}

pub async fn profile(args: ProfileArgs, client: &Client) -> Result<()> {
    let user = client.profile(&args.user).await?;
    write_json_line(&mut std::io::stdout().lock(), &user)
}

pub async fn url(args: UrlArgs, client: &Client) -> Result<()> {
    let films = client.items_for_url(&args.url).await?;
    log::info!("{} films from {}", films.len(), args.url);
    print_films(&films)
}
