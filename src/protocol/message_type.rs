// Defines the action requested from the database server.
// Is documented as Message Type.
// Request types that relate to distributed transactions or scrollable
// cursors are omitted.
#[derive(Copy, Clone, Debug)]
pub(crate) enum MessageType {
    ExecuteDirect = 2,    // Directly execute SQL statement
    Prepare = 3,          // Prepare an SQL statement
    Execute = 13,         // Execute a previously prepared SQL statement
    ReadLob = 16,         // Reads large object data
    WriteLob = 17,        // Writes large object data
    Authenticate = 65,    // Sends authentication data
    Connect = 66,         // Connects to the database
    Commit = 67,          // Commits current transaction
    Rollback = 68,        // Rolls back current transaction
    CloseResultSet = 69,  // Closes resultset
    DropStatementId = 70, // Drops prepared statement identifier
    FetchNext = 71,       // Fetches next data from resultset
    Disconnect = 77,      // Disconnects session
}
