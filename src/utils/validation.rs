use regex::Regex;

pub fn validate_email(email: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    re.is_match(email)
}

/// Accepts a GitHub profile URL, e.g. https://github.com/username
pub fn validate_github_url(url: &str) -> bool {
    let re = Regex::new(r"^(https?://)?(www\.)?github\.com/[a-zA-Z0-9_-]+/?$").unwrap();
    re.is_match(url)
}

pub fn validate_graduation_year(year: i32) -> bool {
    (1900..=2100).contains(&year)
}

pub fn validate_password(password: &str) -> bool {
    password.len() >= 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_profile_urls() {
        assert!(validate_github_url("https://github.com/octocat"));
        assert!(validate_github_url("http://www.github.com/oct-o-cat/"));
        assert!(validate_github_url("github.com/some_user"));
        assert!(!validate_github_url("https://github.com/octocat/repo"));
        assert!(!validate_github_url("https://gitlab.com/octocat"));
        assert!(!validate_github_url(""));
    }

    #[test]
    fn graduation_year_bounds() {
        assert!(validate_graduation_year(1900));
        assert!(validate_graduation_year(2027));
        assert!(validate_graduation_year(2100));
        assert!(!validate_graduation_year(1899));
        assert!(!validate_graduation_year(2101));
    }
}
