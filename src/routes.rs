//! Site routes and their paths.
//!
//! Paths are the same ones the web front end exposes, so a link copied from the
//! browser (`/vtuber/UC...`, `/search?query=...`) can be opened here as well.

use crate::foundation::models::SearchParams;
use url::{form_urlencoded, Url};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Search(SearchParams),
    Vtuber { channel_id: String },
    Privacy,
    LoginSuccess,
    LoginFailure,
    NotFound,
}

impl Route {
    /// Resolves a path with an optional query string, or a full URL, to a route.
    ///
    /// # Examples
    ///
    /// ```
    /// use vsong::routes::Route;
    ///
    /// assert_eq!(
    ///     Route::parse("/vtuber/UC123"),
    ///     Route::Vtuber { channel_id: "UC123".to_string() }
    /// );
    /// assert_eq!(Route::parse("/nowhere"), Route::NotFound);
    /// ```
    pub fn parse(path_and_query: &str) -> Route {
        let url = match Url::parse("http://localhost/").and_then(|base| base.join(path_and_query)) {
            Ok(url) => url,
            Err(_) => return Route::NotFound,
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Route::Home,
            ["search"] => Route::Search(search_params(&url)),
            ["vtuber", channel_id] => match urlencoding::decode(channel_id) {
                Ok(channel_id) => Route::Vtuber {
                    channel_id: channel_id.into_owned(),
                },
                Err(_) => Route::NotFound,
            },
            ["privacy"] => Route::Privacy,
            ["login", "success"] => Route::LoginSuccess,
            ["login", "failure"] => Route::LoginFailure,
            _ => Route::NotFound,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Search(params) => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                if let Some(q) = params.query.as_deref() {
                    query.append_pair("query", q);
                }
                if let Some(channel_id) = params.channel_id.as_deref() {
                    query.append_pair("channelId", channel_id);
                }
                format!("/search?{}", query.finish())
            }
            Route::Vtuber { channel_id } => format!("/vtuber/{}", urlencoding::encode(channel_id)),
            Route::Privacy => "/privacy".to_string(),
            Route::LoginSuccess => "/login/success".to_string(),
            Route::LoginFailure => "/login/failure".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }
}

fn search_params(url: &Url) -> SearchParams {
    let mut params = SearchParams::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "query" => params.query = Some(value.into_owned()),
            "channelId" => params.channel_id = Some(value.into_owned()),
            _ => {}
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/privacy"), Route::Privacy);
        assert_eq!(Route::parse("/login/success"), Route::LoginSuccess);
        assert_eq!(Route::parse("/login/failure"), Route::LoginFailure);
        assert_eq!(Route::parse("/login"), Route::NotFound);
        assert_eq!(Route::parse("/vtuber"), Route::NotFound);
        assert_eq!(Route::parse("/vtuber/a/b"), Route::NotFound);
    }

    #[test]
    fn test_search_route_decodes_query() {
        let route = Route::parse("/search?query=hoshimachi%20suisei&gender=female");
        assert_eq!(
            route,
            Route::Search(SearchParams::by_query("hoshimachi suisei"))
        );

        let route = Route::parse("/search?channelId=UC1");
        assert_eq!(
            route,
            Route::Search(SearchParams {
                query: None,
                channel_id: Some("UC1".to_string()),
            })
        );
    }

    #[test]
    fn test_vtuber_segment_is_decoded() {
        let route = Route::parse("/vtuber/UC%20a%2Fb");
        assert_eq!(
            route,
            Route::Vtuber {
                channel_id: "UC a/b".to_string()
            }
        );
        assert_eq!(route.to_path(), "/vtuber/UC%20a%2Fb");
        assert_eq!(Route::parse(&route.to_path()), route);

        assert_eq!(Route::parse("/vtuber/%FF"), Route::NotFound);
    }

    #[test]
    fn test_full_url_is_accepted() {
        assert_eq!(
            Route::parse("http://localhost:3000/vtuber/UCabc?x=1"),
            Route::Vtuber {
                channel_id: "UCabc".to_string()
            }
        );
    }

    #[test]
    fn test_search_path_encodes_values() {
        let route = Route::Search(SearchParams {
            query: Some("a&b c".to_string()),
            channel_id: Some("UC1".to_string()),
        });
        let path = route.to_path();
        assert_eq!(path, "/search?query=a%26b+c&channelId=UC1");
        assert_eq!(Route::parse(&path), route);
    }

    #[test]
    fn test_paths_resolve_back() {
        for route in [
            Route::Home,
            Route::Privacy,
            Route::LoginSuccess,
            Route::LoginFailure,
            Route::Vtuber {
                channel_id: "UCxyz".to_string(),
            },
        ] {
            assert_eq!(Route::parse(&route.to_path()), route);
        }
    }
}
