use hmac::{Hmac, Mac};
use secstr::SecUtf8;
use sha2::{Digest, Sha256};

// The salted-challenge computation of SCRAM-SHA256:
// salted_password   = HMAC(password, salt)
// client_key        = SHA256(salted_password)
// stored_key        = SHA256(client_key)
// client_signature  = HMAC(stored_key, salt || server_nonce || client_nonce)
// client_proof      = client_signature XOR client_key
pub(crate) fn scram_sha256(
    salt: &[u8],
    server_nonce: &[u8],
    client_nonce: &[u8],
    password: &SecUtf8,
) -> Result<Vec<u8>, crypto_common::InvalidLength> {
    let salted_password = hmac(password.unsecure().as_ref(), salt)?;

    let (s, sn, cn) = (salt.len(), server_nonce.len(), client_nonce.len());
    let mut content: Vec<u8> = vec![0; s + sn + cn];
    content[0..s].copy_from_slice(salt);
    content[s..(s + sn)].copy_from_slice(server_nonce);
    content[(s + sn)..].copy_from_slice(client_nonce);

    let client_key: Vec<u8> = sha256(&salted_password);
    let client_signature: Vec<u8> = hmac(&sha256(&client_key), &content)?;

    Ok(xor(&client_signature, &client_key))
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, crypto_common::InvalidLength> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub(crate) fn sha256(input: &[u8]) -> Vec<u8> {
    let mut sha = Sha256::new();
    sha.update(input);
    sha.finalize().to_vec()
}

pub(crate) fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    assert_eq!(a.len(), b.len(), "xor needs two equally long parameters");

    let mut bytes: Vec<u8> = vec![0_u8; a.len()];
    for i in 0..a.len() {
        bytes[i] = a[i] ^ b[i];
    }
    bytes
}

#[cfg(test)]
mod tests {
    use secstr::SecUtf8;

    // Reference vector computed independently from the formula above.
    #[test]
    fn client_proof_matches_reference_vector() {
        let salt = hex::decode("80964fa85428ae3a81acd3e686a27933").unwrap();
        let server_nonce = hex::decode(
            "41065150117e455fec2f03f6f47c19d405ade50dd65731dc\
             0fb3f7954db62c8aa67a7e825e1300bee975e74518238c9a",
        )
        .unwrap();
        let client_nonce = hex::decode("edbd7cc8b2f264489d65a7cd51e27f2e").unwrap();
        let password = SecUtf8::from("secret");

        let proof =
            super::scram_sha256(&salt, &server_nonce, &client_nonce, &password).unwrap();
        assert_eq!(
            hex::encode(proof),
            "2cb3ef39e9242c3192e8e716b5e95ac2d5983a36d143844fb8579ab58c433163"
        );
    }

    #[test]
    fn proof_is_deterministic_and_password_sensitive() {
        let salt = [1_u8; 16];
        let server_nonce = [2_u8; 48];
        let client_nonce = [3_u8; 16];
        let p1 = super::scram_sha256(
            &salt,
            &server_nonce,
            &client_nonce,
            &SecUtf8::from("secret"),
        )
        .unwrap();
        let p2 = super::scram_sha256(
            &salt,
            &server_nonce,
            &client_nonce,
            &SecUtf8::from("secret"),
        )
        .unwrap();
        let p3 = super::scram_sha256(
            &salt,
            &server_nonce,
            &client_nonce,
            &SecUtf8::from("Secret"),
        )
        .unwrap();
        assert_eq!(p1, p2);
        assert_ne!(p1, p3);
        assert_eq!(p1.len(), 32);
    }
}
