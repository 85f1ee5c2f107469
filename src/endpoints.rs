/// How a probe decides that it passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// Envelope `error == 0`; lists the stores it carries.
    StoreList,
    /// HTTP 200; shows a truncated pretty rendering of the body.
    Json { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub step: u8,
    pub icon: &'static str,
    pub path: &'static str,
    pub paginated: bool,
    pub kind: ProbeKind,
    pub success: &'static str,
}

pub const PROFILE_PREVIEW_CHARS: usize = 200;
pub const BODY_PREVIEW_CHARS: usize = 300;
pub const ERROR_BODY_CHARS: usize = 200;
pub const TOKEN_PREVIEW_CHARS: usize = 50;
pub const STORE_PREVIEW_COUNT: usize = 3;

const fn json(limit: usize) -> ProbeKind {
    ProbeKind::Json { limit }
}

/// Read-only endpoints in the order they are probed. Step 1 is the login.
pub const ENDPOINTS: [Endpoint; 9] = [
    Endpoint { step: 2, icon: "🏪", path: "/user/stores", paginated: false, kind: ProbeKind::StoreList, success: "stores found" },
    Endpoint { step: 3, icon: "👤", path: "/user/profile", paginated: false, kind: json(PROFILE_PREVIEW_CHARS), success: "Profile retrieved" },
    Endpoint { step: 4, icon: "📦", path: "/orders", paginated: true, kind: json(BODY_PREVIEW_CHARS), success: "Orders retrieved" },
    Endpoint { step: 5, icon: "🛍️ ", path: "/products", paginated: true, kind: json(BODY_PREVIEW_CHARS), success: "Products retrieved" },
    Endpoint { step: 6, icon: "👥", path: "/customers", paginated: true, kind: json(BODY_PREVIEW_CHARS), success: "Customers retrieved" },
    Endpoint { step: 7, icon: "📁", path: "/categories", paginated: false, kind: json(BODY_PREVIEW_CHARS), success: "Categories retrieved" },
    Endpoint { step: 8, icon: "🏷️ ", path: "/brands", paginated: false, kind: json(BODY_PREVIEW_CHARS), success: "Brands retrieved" },
    Endpoint { step: 9, icon: "📊", path: "/dashboard/stats", paginated: false, kind: json(BODY_PREVIEW_CHARS), success: "Statistics retrieved" },
    Endpoint { step: 10, icon: "🔌", path: "/auth/test", paginated: false, kind: json(BODY_PREVIEW_CHARS), success: "Connectivity test passed" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 5 }
    }
}

impl Pagination {
    pub fn query(&self) -> [(&'static str, String); 2] {
        [("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_follow_login() {
        let steps: Vec<u8> = ENDPOINTS.iter().map(|e| e.step).collect();
        assert_eq!(steps, (2..=10).collect::<Vec<u8>>());
    }

    #[test]
    fn only_listings_are_paginated() {
        let paginated: Vec<&str> = ENDPOINTS
            .iter()
            .filter(|e| e.paginated)
            .map(|e| e.path)
            .collect();
        assert_eq!(paginated, ["/orders", "/products", "/customers"]);
    }

    #[test]
    fn previews_stay_within_bounds() {
        for endpoint in &ENDPOINTS {
            if let ProbeKind::Json { limit } = endpoint.kind {
                assert!((200..=300).contains(&limit), "{}", endpoint.path);
            }
        }
    }

    #[test]
    fn pagination_query_pairs() {
        let q = Pagination { page: 2, limit: 10 }.query();
        assert_eq!(q, [("page", "2".to_string()), ("limit", "10".to_string())]);
        assert_eq!(Pagination::default(), Pagination { page: 1, limit: 5 });
    }
}
