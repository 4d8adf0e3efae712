use crate::health::domain::RepositoryRef;

const GITHUB_HOST: &str = "github.com";

/// Extracts the GitHub owner/name from a registry repository URL.
///
/// Accepts the spellings registries carry in practice:
/// `git+https://github.com/o/r.git`, `git://github.com/o/r`,
/// `ssh://git@github.com/o/r.git`, `git@github.com:o/r.git`,
/// `github:o/r`, bare `o/r` shorthand and URLs with a trailing path
/// such as `/tree/main/packages/x`. Non-GitHub hosts yield `None`.
pub fn parse_github_repository(url: &str) -> Option<RepositoryRef> {
    let url = url.trim();
    let url = url.strip_prefix("git+").unwrap_or(url);

    let path = if let Some(rest) = url.strip_prefix("github:") {
        rest
    } else if let Some(rest) = url.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        if !host.eq_ignore_ascii_case(GITHUB_HOST) {
            return None;
        }
        path
    } else if let Some((_, rest)) = url.split_once("://") {
        // drop userinfo (git@) and split host from path
        let rest = rest.rsplit_once('@').map_or(rest, |(_, r)| r);
        let (host, path) = rest.split_once('/')?;
        let host = host.split(':').next().unwrap_or(host);
        if !host.eq_ignore_ascii_case(GITHUB_HOST) && !host.eq_ignore_ascii_case("www.github.com") {
            return None;
        }
        path
    } else if is_shorthand(url) {
        url
    } else {
        return None;
    };

    let mut segments = path
        .split(['/', '#', '?'])
        .filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let name = segments.next()?;
    let name = name.strip_suffix(".git").unwrap_or(name);
    if name.is_empty() {
        return None;
    }
    Some(RepositoryRef::new(owner, name))
}

/// `owner/repo` with nothing else
fn is_shorthand(value: &str) -> bool {
    let mut parts = value.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(repo), None) if is_segment(owner) && is_segment(repo)
    )
}

fn is_segment(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
