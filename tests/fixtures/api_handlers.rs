// Code generated by apigen from api.rs. DO NOT EDIT.

const APIGEN_AUTH_HEADER: &str = "Authorization";
const APIGEN_AUTH_TOKEN: &str = "100500";

impl MyApi {
    // GET /user/profile
    pub fn handle_profile(&self, req: &::apigen::runtime::Request) -> ::apigen::runtime::Response {
        use ::apigen::runtime as rt;
        let params: ProfileParams = match rt::decode_body(req) {
            Ok(params) => params,
            Err(_) => {
                return rt::error_response(rt::StatusCode::BAD_REQUEST, "invalid request body");
            }
        };
        if params.login.is_empty() {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "login must be not empty");
        }
        let ctx = rt::Context::from_request(req);
        match self.profile(&ctx, params) {
            Ok(result) => rt::json_response(&result),
            Err(err) => rt::error_response(rt::StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
        }
    }
}

impl MyApi {
    // POST /user/create
    pub fn handle_create(&self, req: &::apigen::runtime::Request) -> ::apigen::runtime::Response {
        use ::apigen::runtime as rt;
        if !rt::header_equals(req, APIGEN_AUTH_HEADER, APIGEN_AUTH_TOKEN) {
            return rt::error_response(rt::StatusCode::UNAUTHORIZED, "unauthorized");
        }
        let params: CreateParams = match rt::decode_body(req) {
            Ok(params) => params,
            Err(_) => {
                return rt::error_response(rt::StatusCode::BAD_REQUEST, "invalid request body");
            }
        };
        if params.login.is_empty() {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "login must be not empty");
        }
        if params.login.chars().count() < 10 {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "login length must be >= 10");
        }
        if !matches!(params.status.as_str(), "user" | "moderator" | "admin") {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "status must be one of [user|moderator|admin]");
        }
        if params.age < 0 {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "age must be >= 0");
        }
        if params.age > 128 {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "age must be <= 128");
        }
        let ctx = rt::Context::from_request(req);
        match self.create(&ctx, params) {
            Ok(result) => rt::json_response(&result),
            Err(err) => rt::error_response(rt::StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
        }
    }
}

impl OtherApi {
    // POST /user/create
    pub fn handle_create(&self, req: &::apigen::runtime::Request) -> ::apigen::runtime::Response {
        use ::apigen::runtime as rt;
        if !rt::header_equals(req, APIGEN_AUTH_HEADER, APIGEN_AUTH_TOKEN) {
            return rt::error_response(rt::StatusCode::UNAUTHORIZED, "unauthorized");
        }
        let params: OtherCreateParams = match rt::decode_body(req) {
            Ok(params) => params,
            Err(_) => {
                return rt::error_response(rt::StatusCode::BAD_REQUEST, "invalid request body");
            }
        };
        if params.username.is_empty() {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "username must be not empty");
        }
        if params.username.chars().count() < 3 {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "username length must be >= 3");
        }
        if !matches!(params.class.as_str(), "warrior" | "sorcerer" | "rouge") {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "class must be one of [warrior|sorcerer|rouge]");
        }
        if params.level < 1 {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "level must be >= 1");
        }
        if params.level > 50 {
            return rt::error_response(rt::StatusCode::BAD_REQUEST, "level must be <= 50");
        }
        let ctx = rt::Context::from_request(req);
        match self.create(ctx, params) {
            Ok(result) => rt::json_response(&result),
            Err(err) => rt::error_response(rt::StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
        }
    }
}

impl ::apigen::runtime::ApiService for MyApi {
    fn serve_http(&self, req: &::apigen::runtime::Request) -> ::apigen::runtime::Response {
        use ::apigen::runtime as rt;
        match (req.method().as_str(), req.uri().path()) {
            ("GET", "/user/profile") => self.handle_profile(req),
            ("POST", "/user/create") => self.handle_create(req),
            (method, path) => rt::error_response(
                rt::StatusCode::NOT_FOUND,
                &format!("unknown method {method} on {path}"),
            ),
        }
    }
}

impl ::apigen::runtime::ApiService for OtherApi {
    fn serve_http(&self, req: &::apigen::runtime::Request) -> ::apigen::runtime::Response {
        use ::apigen::runtime as rt;
        match (req.method().as_str(), req.uri().path()) {
            ("POST", "/user/create") => self.handle_create(req),
            (method, path) => rt::error_response(
                rt::StatusCode::NOT_FOUND,
                &format!("unknown method {method} on {path}"),
            ),
        }
    }
}
