use super::authenticator::Authenticator;
use crate::{
    conn::{AmConnCore, ConnectionCore},
    hdb_error::impl_err,
    protocol::{
        parts::{AuthFields, ClientContext},
        MessageType, Part, Reply, Request,
    },
    HdbError, HdbResult,
};

pub(crate) enum FirstAuthResponse {
    AuthenticatorAndChallenge(String, Vec<u8>),
}

// AUTHENTICATE round trip: propose the authenticators, each with its
// client challenge; the server answers with the method it selected and its
// own challenge.
pub(crate) fn first_auth_request(
    conn_core: &mut ConnectionCore,
    am_conn_core: &AmConnCore,
    authenticators: &[Box<dyn Authenticator + Send + Sync>],
) -> HdbResult<FirstAuthResponse> {
    let mut request = Request::new(MessageType::Authenticate, 0);

    let mut auth_fields_out = AuthFields::with_capacity(1 + 2 * authenticators.len());
    auth_fields_out.push_string(conn_core.connect_params().dbuser());
    for authenticator in authenticators {
        debug!("proposing {}", authenticator.name());
        auth_fields_out.push(authenticator.name_as_bytes());
        auth_fields_out.push(authenticator.client_challenge().to_vec());
    }
    request.push(Part::Auth(auth_fields_out));

    // for MessageType::Authenticate the default error handling is off
    let (reply, _) = conn_core.roundtrip(&request, am_conn_core, None, None, &mut None)?;
    evaluate_first_response(reply)
}

fn evaluate_first_response(reply: Reply) -> HdbResult<FirstAuthResponse> {
    let mut parts_iter = reply.parts.into_iter();
    let result = match parts_iter.next() {
        Some(Part::Auth(mut auth_fields)) => {
            match (auth_fields.pop(), auth_fields.pop(), auth_fields.pop()) {
                (Some(server_challenge_data), Some(raw_name), None) => {
                    let authenticator_name = String::from_utf8_lossy(&raw_name).to_string();
                    Ok(FirstAuthResponse::AuthenticatorAndChallenge(
                        authenticator_name,
                        server_challenge_data,
                    ))
                }
                (_, _, _) => Err(impl_err!("expected 2 auth_fields")),
            }
        }
        Some(Part::Error(server_errors)) => Err(HdbError::Authentication {
            source: Box::new(HdbError::Db(server_errors)),
        }),
        o_part => Err(impl_err!("unexpected db response with part: {o_part:?}")),
    };

    for part in parts_iter {
        warn!("first_auth_request(): ignoring unexpected part = {part:?}");
    }

    result
}

// CONNECT round trip: user, selected method, and the client proof, plus
// the introduction parts CLIENT_ID and CLIENT_CONTEXT. The session id
// comes back in the packet header.
pub(crate) fn second_auth_request(
    conn_core: &mut ConnectionCore,
    am_conn_core: &AmConnCore,
    chosen_authenticator: &mut dyn Authenticator,
    server_challenge_data: &[u8],
) -> HdbResult<()> {
    let mut request = Request::new(MessageType::Connect, 0);

    debug!("authenticating with {}", chosen_authenticator.name());

    let mut auth_fields = AuthFields::with_capacity(3);
    auth_fields.push_string(conn_core.connect_params().dbuser());
    auth_fields.push(chosen_authenticator.name_as_bytes());
    auth_fields.push(
        chosen_authenticator
            .client_proof(server_challenge_data, conn_core.connect_params().password())?,
    );
    request.push(Part::Auth(auth_fields));

    request.push(Part::ClientId(client_id()));
    request.push(Part::ClientContext(ClientContext::new(
        conn_core.connect_params().application(),
        conn_core.connect_params().clientlocale(),
    )));

    let (reply, _) = conn_core
        .roundtrip(&request, am_conn_core, None, None, &mut None)
        .map_err(|e| match e {
            HdbError::Db(server_errors) => HdbError::Authentication {
                source: Box::new(HdbError::Db(server_errors)),
            },
            e => e,
        })?;

    conn_core.set_session_id(reply.session_id());

    for part in reply.parts {
        match part {
            Part::TopologyInformation(topology) => conn_core.set_topology(topology),
            Part::Auth(_auth_fields) => {
                // carries the server proof; not evaluated
                trace!("second_auth_request: received server auth fields");
            }
            part => warn!("second_auth_request: ignoring unexpected part = {part:?}"),
        }
    }
    Ok(())
}

// identifies this client process to the server
fn client_id() -> String {
    format!(
        "{}@{}",
        std::process::id(),
        username::get_user_name().unwrap_or_default()
    )
}
