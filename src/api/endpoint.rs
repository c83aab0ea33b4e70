use crate::api::{ApiRequest, Encoding};
use crate::models::{PostStatus, VisibilityScope};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// Which header set the client attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPolicy {
    FormUrlEncoded,
    WithoutToken,
    WithAuthorization,
    MultipartWithAuthorization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub school_name: String,
    pub school_region: String,
    pub school_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSetting {
    pub user_profile_image: Option<String>,
    pub user_nickname: String,
    pub school: School,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCreate {
    pub visibility_scope: VisibilityScope,
    pub title: String,
    pub price: Option<i64>,
    pub contents: Option<String>,
    pub external_url: Option<String>,
}

/// Every REST endpoint the client talks to.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    LoginCode { authorization: String },
    CheckNickname { nickname: String },
    SetupProfile(ProfileSetting),
    RefreshToken { refresh_token: String, identifier: String },
    Posts { page: u32, size: u32, visibility_scope: VisibilityScope },
    PostDetail { post_id: i64 },
    CreatePost(PostCreate),
    Vote { post_id: i64, agree: bool },
    Search {
        page: u32,
        size: u32,
        keyword: String,
        visibility_scope: VisibilityScope,
        post_status: PostStatus,
    },
    Comments { post_id: i64 },
    CreateComment { post_id: i64, content: String, parent_id: Option<i64> },
    DeleteComment { post_id: i64, comment_id: i64 },
    MyPosts { page: u32, size: u32, category: String },
    Reviews { visibility_scope: VisibilityScope },
    MoreReviews {
        visibility_scope: VisibilityScope,
        page: u32,
        size: u32,
        review_type: String,
    },
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::LoginCode { .. } => "/login/oauth2/code/apple".to_string(),
            Endpoint::CheckNickname { .. } => "/api/profiles/isValidNickname".to_string(),
            Endpoint::SetupProfile(_) => "/api/profiles".to_string(),
            Endpoint::RefreshToken { .. } => "/api/auth/refresh".to_string(),
            Endpoint::Posts { .. } | Endpoint::CreatePost(_) => "/api/posts".to_string(),
            Endpoint::PostDetail { post_id } => format!("/api/posts/{}", post_id),
            Endpoint::Vote { post_id, .. } => format!("/api/posts/{}/votes", post_id),
            Endpoint::Search { .. } => "/api/posts/search".to_string(),
            Endpoint::Comments { post_id } | Endpoint::CreateComment { post_id, .. } => {
                format!("/api/posts/{}/comments", post_id)
            }
            Endpoint::DeleteComment { post_id, comment_id } => {
                format!("/api/posts/{}/comments/{}", post_id, comment_id)
            }
            Endpoint::MyPosts { .. } => "/api/mypage/posts".to_string(),
            Endpoint::Reviews { .. } => "/api/reviews".to_string(),
            Endpoint::MoreReviews { review_type, .. } => format!("/api/reviews/{}", review_type),
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::LoginCode { .. }
            | Endpoint::CheckNickname { .. }
            | Endpoint::SetupProfile(_)
            | Endpoint::RefreshToken { .. }
            | Endpoint::CreatePost(_)
            | Endpoint::Vote { .. }
            | Endpoint::CreateComment { .. } => HttpMethod::Post,
            Endpoint::DeleteComment { .. } => HttpMethod::Delete,
            _ => HttpMethod::Get,
        }
    }

    pub fn parameters(&self) -> Map<String, Value> {
        let value = match self {
            Endpoint::LoginCode { authorization } => json!({ "state": "test", "code": authorization }),
            Endpoint::CheckNickname { nickname } => json!({ "nickname": nickname }),
            Endpoint::SetupProfile(profile) => json!({
                "userProfileImage": profile.user_profile_image,
                "userNickname": profile.user_nickname,
                "school": profile.school,
            }),
            Endpoint::RefreshToken { refresh_token, identifier } => {
                json!({ "refreshToken": refresh_token, "identifier": identifier })
            }
            Endpoint::Posts { page, size, visibility_scope } => json!({
                "page": page,
                "size": size,
                "visibilityScope": visibility_scope.as_str(),
            }),
            Endpoint::PostDetail { post_id } => json!({ "postId": post_id }),
            Endpoint::CreatePost(post) => json!({
                "visibilityScope": post.visibility_scope.as_str(),
                "title": post.title,
                "price": post.price.unwrap_or(0),
                "contents": post.contents.clone().unwrap_or_default(),
                "externalURL": post.external_url.clone().unwrap_or_default(),
            }),
            Endpoint::Vote { agree, .. } => json!({ "myChoice": agree }),
            Endpoint::Search { page, size, keyword, visibility_scope, post_status } => json!({
                "page": page,
                "size": size,
                "keyword": keyword,
                "visibilityScope": visibility_scope.as_str(),
                "postStatus": post_status.as_str(),
            }),
            Endpoint::Comments { post_id } => json!({ "postId": post_id }),
            Endpoint::CreateComment { content, parent_id, .. } => {
                let mut body = json!({ "content": content });
                // Top-level comments omit the parent entirely
                if let Some(parent_id) = parent_id.filter(|id| *id > 0) {
                    body["parentId"] = json!(parent_id);
                }
                body
            }
            Endpoint::DeleteComment { .. } => json!({}),
            Endpoint::MyPosts { page, size, category } => json!({
                "page": page,
                "size": size,
                "myVoteCategoryType": category,
            }),
            Endpoint::Reviews { visibility_scope } => {
                json!({ "visibilityScope": visibility_scope.as_str() })
            }
            Endpoint::MoreReviews { visibility_scope, page, size, review_type } => json!({
                "visibilityScope": visibility_scope.as_str(),
                "page": page,
                "size": size,
                "reviewType": review_type,
            }),
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Endpoint::LoginCode { .. } | Endpoint::PostDetail { .. } | Endpoint::Comments { .. } => {
                Encoding::FormUrlEncoded
            }
            Endpoint::Posts { .. }
            | Endpoint::Search { .. }
            | Endpoint::MyPosts { .. }
            | Endpoint::Reviews { .. }
            | Endpoint::MoreReviews { .. } => Encoding::QueryString,
            Endpoint::CreatePost(_) => Encoding::Multipart,
            Endpoint::DeleteComment { .. } => Encoding::Plain,
            _ => Encoding::Json,
        }
    }

    pub fn headers(&self) -> HeaderPolicy {
        match self {
            Endpoint::LoginCode { .. } => HeaderPolicy::FormUrlEncoded,
            Endpoint::RefreshToken { .. } => HeaderPolicy::WithoutToken,
            Endpoint::CreatePost(_) => HeaderPolicy::MultipartWithAuthorization,
            _ => HeaderPolicy::WithAuthorization,
        }
    }

    pub fn request(&self) -> ApiRequest {
        ApiRequest {
            method: self.method(),
            path: self.path(),
            parameters: self.parameters(),
            encoding: self.encoding(),
            headers: self.headers(),
        }
    }
}
