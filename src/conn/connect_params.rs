use secstr::SecUtf8;

/// The immutable parameters of a connection: where to connect to, and as
/// whom.
///
/// Tunable runtime behavior lives in
/// [`ConnectionConfiguration`](crate::ConnectionConfiguration).
#[derive(Clone, Debug)]
pub struct ConnectParams {
    host: String,
    port: u16,
    dbuser: String,
    password: SecUtf8,
    clientlocale: Option<String>,
    application: String,
}

impl ConnectParams {
    /// Creates connect parameters for the given address and credentials.
    ///
    /// The port of a HANA instance is `3<instance>15`, e.g. 30015 for
    /// instance 00.
    pub fn new<H, U, P>(host: H, port: u16, dbuser: U, password: P) -> Self
    where
        H: Into<String>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            host: host.into(),
            port,
            dbuser: dbuser.into(),
            password: SecUtf8::from(password.into()),
            clientlocale: None,
            application: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    /// Sets the client locale that is sent to the server at connect time.
    #[must_use]
    pub fn with_clientlocale<S: Into<String>>(mut self, locale: S) -> Self {
        self.clientlocale = Some(locale.into());
        self
    }

    /// Sets the application name that is sent to the server at connect
    /// time.
    #[must_use]
    pub fn with_application<S: Into<String>>(mut self, application: S) -> Self {
        self.application = application.into();
        self
    }

    /// The host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The socket address.
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }

    /// The database user.
    pub fn dbuser(&self) -> &str {
        &self.dbuser
    }

    pub(crate) fn password(&self) -> &SecUtf8 {
        &self.password
    }

    pub(crate) fn clientlocale(&self) -> Option<&str> {
        self.clientlocale.as_deref()
    }

    pub(crate) fn application(&self) -> &str {
        &self.application
    }
}

impl std::fmt::Display for ConnectParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}@{}:{}", self.dbuser, self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectParams;

    #[test]
    fn password_is_not_leaked_by_debug() {
        let params = ConnectParams::new("localhost", 30015, "SYSTEM", "very_secret");
        let debug = format!("{params:?}");
        assert!(!debug.contains("very_secret"));
        assert_eq!(params.dbuser(), "SYSTEM");
        assert_eq!(params.addr(), ("localhost", 30015));
    }
}
